use serde_json::{Map, Value};

pub const UNKNOWN_CONTROLLER: &str = "Unknown";

/// Device intensity runs 0..=100; host brightness runs 0..=255.
pub const MAX_INTENSITY: u8 = 100;
pub const MAX_HUE: u16 = 359;
pub const MAX_SATURATION: u8 = 100;

/// Host brightness (0-255) to device intensity (0-100), rounded to nearest.
pub fn brightness_to_intensity(brightness: u8) -> u8 {
    // b * 100 / 255 never lands exactly on .5, so +127 rounds correctly.
    ((brightness as u32 * 100 + 127) / 255) as u8
}

/// Device intensity (0-100) to host brightness (0-255), half rounds up.
pub fn intensity_to_brightness(intensity: u8) -> u8 {
    let intensity = intensity.min(MAX_INTENSITY) as u32;
    ((intensity * 255 + 50) / 100) as u8
}

/// What the controller reports about itself in response to `ControllerName`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerIdentity {
    pub name: String,
    pub raw: Map<String, Value>,
}

impl ControllerIdentity {
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        let name = raw
            .get("Controller")
            .and_then(|v| v.as_str())
            .unwrap_or(UNKNOWN_CONTROLLER)
            .to_string();
        Self { name, raw }
    }

    /// The reported controller name, if any. Stable across restarts, so it is
    /// what duplicate registrations are detected with.
    pub fn unique_id(&self) -> Option<&str> {
        self.raw.get("Controller").and_then(|v| v.as_str())
    }

    pub fn family(&self) -> ControllerFamily {
        ControllerFamily::classify(&self.name)
    }
}

/// Controller firmware family (ZD, ZDC, ZDTWO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerFamily {
    #[default]
    Base,
    ColorCapable,
    TwoCapable,
}

impl ControllerFamily {
    /// Case-insensitive substring match; "lxzdc" is checked before "lxtwo".
    pub fn classify(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("lxzdc") {
            ControllerFamily::ColorCapable
        } else if name.contains("lxtwo") {
            ControllerFamily::TwoCapable
        } else {
            ControllerFamily::Base
        }
    }

    pub fn supports_color(&self) -> bool {
        matches!(
            self,
            ControllerFamily::ColorCapable | ControllerFamily::TwoCapable
        )
    }

    pub fn as_luxor_str(&self) -> &'static str {
        match self {
            ControllerFamily::Base => "ZD",
            ControllerFamily::ColorCapable => "ZDC",
            ControllerFamily::TwoCapable => "ZDTWO",
        }
    }
}

pub fn classify(identity: &ControllerIdentity) -> ControllerFamily {
    identity.family()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorType {
    #[default]
    Mono,
    Color,
}

impl ColorType {
    pub fn from_luxor_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(ColorType::Mono),
            2 => Some(ColorType::Color),
            _ => None,
        }
    }

    pub fn as_luxor_code(&self) -> u8 {
        match self {
            ColorType::Mono => 1,
            ColorType::Color => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightGroup {
    pub group_number: u16,
    pub name: String,
    pub color_type: ColorType,
    pub intensity: u8,
    /// Only set for color groups.
    pub hue: Option<u16>,
    /// Only set for color groups.
    pub saturation: Option<u8>,
}

impl LightGroup {
    pub fn is_on(&self) -> bool {
        self.intensity > 0
    }

    pub fn brightness(&self) -> u8 {
        intensity_to_brightness(self.intensity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub theme_index: u16,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_endpoints() {
        assert_eq!(brightness_to_intensity(0), 0);
        assert_eq!(brightness_to_intensity(255), 100);
        assert_eq!(intensity_to_brightness(0), 0);
        assert_eq!(intensity_to_brightness(100), 255);
    }

    #[test]
    fn intensity_rounds_to_nearest() {
        // 128 * 100 / 255 = 50.19
        assert_eq!(brightness_to_intensity(128), 50);
        // 2 * 100 / 255 = 0.78
        assert_eq!(brightness_to_intensity(2), 1);
        // Exact halves round up: 10 * 255 / 100 = 25.5, 30 * 255 / 100 = 76.5
        assert_eq!(intensity_to_brightness(10), 26);
        assert_eq!(intensity_to_brightness(30), 77);
        assert_eq!(intensity_to_brightness(50), 128);
    }

    #[test]
    fn intensity_above_range_is_clamped() {
        assert_eq!(intensity_to_brightness(150), 255);
    }

    #[test]
    fn identity_without_controller_is_unknown() {
        let identity = ControllerIdentity::from_raw(Map::new());
        assert_eq!(identity.name, UNKNOWN_CONTROLLER);
        assert_eq!(identity.unique_id(), None);
        assert_eq!(identity.family(), ControllerFamily::Base);
    }

    #[test]
    fn color_type_codes() {
        assert_eq!(ColorType::from_luxor_code(1), Some(ColorType::Mono));
        assert_eq!(ColorType::from_luxor_code(2), Some(ColorType::Color));
        assert_eq!(ColorType::from_luxor_code(0), None);
        assert_eq!(ColorType::Color.as_luxor_code(), 2);
    }
}
