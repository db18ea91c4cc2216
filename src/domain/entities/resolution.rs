//! Target output resolutions and their reaction gestures.

/// Reaction emoji selecting the 240x135 output.
pub const GESTURE_SMALL: &str = "1\u{fe0f}\u{20e3}";
/// Reaction emoji selecting the 320x170 output.
pub const GESTURE_MEDIUM: &str = "2\u{fe0f}\u{20e3}";
/// Reaction emoji selecting the 320x240 output.
pub const GESTURE_LARGE: &str = "3\u{fe0f}\u{20e3}";

/// A fixed target output resolution, selected by reaction gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetResolution {
    /// 240x135 output.
    Small,
    /// 320x170 output.
    Medium,
    /// 320x240 output.
    Large,
}

impl TargetResolution {
    /// All resolutions in gesture order, for seeding the control message.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Maps a reaction emoji to its resolution, if recognized.
    #[must_use]
    pub fn from_gesture(emoji: &str) -> Option<Self> {
        match emoji {
            GESTURE_SMALL => Some(Self::Small),
            GESTURE_MEDIUM => Some(Self::Medium),
            GESTURE_LARGE => Some(Self::Large),
            _ => None,
        }
    }

    /// The reaction emoji that selects this resolution.
    #[must_use]
    pub const fn gesture(self) -> &'static str {
        match self {
            Self::Small => GESTURE_SMALL,
            Self::Medium => GESTURE_MEDIUM,
            Self::Large => GESTURE_LARGE,
        }
    }

    /// Output width in pixels.
    #[must_use]
    pub const fn width(self) -> u32 {
        match self {
            Self::Small => 240,
            Self::Medium | Self::Large => 320,
        }
    }

    /// Output height in pixels.
    #[must_use]
    pub const fn height(self) -> u32 {
        match self {
            Self::Small => 135,
            Self::Medium => 170,
            Self::Large => 240,
        }
    }

    /// Width and height as a pair.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl std::fmt::Display for TargetResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(GESTURE_SMALL, Some(TargetResolution::Small); "small gesture")]
    #[test_case(GESTURE_MEDIUM, Some(TargetResolution::Medium); "medium gesture")]
    #[test_case(GESTURE_LARGE, Some(TargetResolution::Large); "large gesture")]
    #[test_case("👍", None; "unrecognized emoji")]
    #[test_case("", None; "empty string")]
    fn test_gesture_mapping(emoji: &str, expected: Option<TargetResolution>) {
        assert_eq!(TargetResolution::from_gesture(emoji), expected);
    }

    #[test_case(TargetResolution::Small, (240, 135); "small dims")]
    #[test_case(TargetResolution::Medium, (320, 170); "medium dims")]
    #[test_case(TargetResolution::Large, (320, 240); "large dims")]
    fn test_dimensions(resolution: TargetResolution, expected: (u32, u32)) {
        assert_eq!(resolution.dimensions(), expected);
    }

    #[test]
    fn test_gesture_roundtrip() {
        for resolution in TargetResolution::ALL {
            assert_eq!(TargetResolution::from_gesture(resolution.gesture()), Some(resolution));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TargetResolution::Medium.to_string(), "320x170");
    }
}
