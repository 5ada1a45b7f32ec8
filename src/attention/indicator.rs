use serde::{Deserialize, Serialize};

/// The three attention indicators, in their fixed enumeration order.
///
/// The order is observable: ties in the end-of-session ranking go to the
/// indicator listed first here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorName {
    EyeOpenness,
    HeadPose,
    MouthClosure,
}

impl IndicatorName {
    pub const ALL: [IndicatorName; 3] = [
        IndicatorName::EyeOpenness,
        IndicatorName::HeadPose,
        IndicatorName::MouthClosure,
    ];

    /// Label used by the results endpoint and the results table.
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorName::EyeOpenness => "EAR",
            IndicatorName::HeadPose => "Head Pose",
            IndicatorName::MouthClosure => "MOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IndicatorName::EyeOpenness => "Eye Aspect Ratio",
            IndicatorName::HeadPose => "Head Pose",
            IndicatorName::MouthClosure => "Mouth Opening Ratio",
        }
    }
}

/// One value per indicator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PerIndicator<T> {
    pub eye_openness: T,
    pub head_pose: T,
    pub mouth_closure: T,
}

impl<T> PerIndicator<T> {
    pub fn from_fn(mut f: impl FnMut(IndicatorName) -> T) -> Self {
        Self {
            eye_openness: f(IndicatorName::EyeOpenness),
            head_pose: f(IndicatorName::HeadPose),
            mouth_closure: f(IndicatorName::MouthClosure),
        }
    }

    pub fn get(&self, name: IndicatorName) -> &T {
        match name {
            IndicatorName::EyeOpenness => &self.eye_openness,
            IndicatorName::HeadPose => &self.head_pose,
            IndicatorName::MouthClosure => &self.mouth_closure,
        }
    }

    pub fn get_mut(&mut self, name: IndicatorName) -> &mut T {
        match name {
            IndicatorName::EyeOpenness => &mut self.eye_openness,
            IndicatorName::HeadPose => &mut self.head_pose,
            IndicatorName::MouthClosure => &mut self.mouth_closure,
        }
    }

    /// Entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorName, &T)> {
        IndicatorName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

/// Per-frame outcome: whether each indicator's threshold was satisfied.
pub type FrameVerdict = PerIndicator<bool>;

impl FrameVerdict {
    pub fn satisfied(&self) -> impl Iterator<Item = IndicatorName> + '_ {
        self.iter()
            .filter_map(|(name, satisfied)| satisfied.then_some(name))
    }
}
