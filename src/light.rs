use tracing::debug;

use crate::session::ControllerSession;
use crate::types::*;
use crate::Result;

/// How a group can be controlled from the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCapability {
    Brightness,
    HueSaturation,
}

impl LightCapability {
    /// Color groups only get hue/saturation on a color-capable controller.
    pub fn for_group(group: &LightGroup, family: ControllerFamily) -> Self {
        if group.color_type == ColorType::Color && family.supports_color() {
            LightCapability::HueSaturation
        } else {
            LightCapability::Brightness
        }
    }
}

/// Host-side turn-on request. Brightness uses the host 0-255 scale; hue is
/// in degrees and saturation in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnOn {
    pub brightness: Option<u8>,
    pub hs_color: Option<(f64, f64)>,
}

impl TurnOn {
    pub fn brightness(brightness: u8) -> Self {
        Self {
            brightness: Some(brightness),
            hs_color: None,
        }
    }

    pub fn hs_color(hue: f64, saturation: f64) -> Self {
        Self {
            brightness: None,
            hs_color: Some((hue, saturation)),
        }
    }
}

/// A group exposed to the host as a dimmable (and maybe colorable) light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    pub group_number: u16,
    pub name: String,
    pub unique_id: String,
    pub capability: LightCapability,
}

impl Light {
    pub fn new(session: &ControllerSession, group: &LightGroup) -> Self {
        Self {
            group_number: group.group_number,
            name: format!("{}{}", session.name_prefix(), group.name),
            unique_id: format!("luxor_{}_{}", session.host(), group.group_number),
            capability: LightCapability::for_group(group, session.family()),
        }
    }

    pub fn is_on(&self, session: &ControllerSession) -> bool {
        session
            .group(self.group_number)
            .is_some_and(LightGroup::is_on)
    }

    pub fn brightness(&self, session: &ControllerSession) -> u8 {
        session
            .group(self.group_number)
            .map_or(0, LightGroup::brightness)
    }

    /// `None` for brightness-only lights.
    pub fn hs_color(&self, session: &ControllerSession) -> Option<(u16, u8)> {
        if self.capability != LightCapability::HueSaturation {
            return None;
        }
        let group = session.group(self.group_number);
        Some((
            group.and_then(|g| g.hue).unwrap_or(0),
            group.and_then(|g| g.saturation).unwrap_or(0),
        ))
    }

    /// Send the commands for `request`, then refresh the session so the
    /// new state is read back from the controller.
    pub async fn turn_on(&self, session: &mut ControllerSession, request: TurnOn) -> Result<()> {
        let client = session.client();
        match self.capability {
            LightCapability::Brightness => {
                let intensity = brightness_to_intensity(request.brightness.unwrap_or(u8::MAX));
                client.set_group_intensity(self.group_number, intensity).await?;
            }
            LightCapability::HueSaturation => {
                if let Some((hue, saturation)) = request.hs_color {
                    let hue = hue.clamp(0.0, MAX_HUE as f64) as u16;
                    let saturation = saturation.clamp(0.0, MAX_SATURATION as f64) as u8;
                    client
                        .set_hue_saturation(self.group_number, hue, saturation)
                        .await?;
                }
                match (request.brightness, request.hs_color) {
                    (Some(brightness), _) => {
                        let intensity = brightness_to_intensity(brightness);
                        client
                            .set_group_intensity(self.group_number, intensity)
                            .await?;
                    }
                    (None, None) => {
                        client
                            .set_group_intensity(self.group_number, MAX_INTENSITY)
                            .await?;
                    }
                    (None, Some(_)) => {}
                }
            }
        }
        debug!(group = self.group_number, ?request, "light turned on");
        session.refresh().await?;
        Ok(())
    }

    pub async fn turn_off(&self, session: &mut ControllerSession) -> Result<()> {
        session
            .client()
            .set_group_intensity(self.group_number, 0)
            .await?;
        debug!(group = self.group_number, "light turned off");
        session.refresh().await?;
        Ok(())
    }
}

/// A stored theme, exposed to the host as a press-to-activate button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeButton {
    pub theme_index: u16,
    pub name: String,
    pub unique_id: String,
}

impl ThemeButton {
    pub fn new(session: &ControllerSession, theme: &Theme) -> Self {
        Self {
            theme_index: theme.theme_index,
            name: format!("{}{}", session.name_prefix(), theme.name),
            unique_id: format!("luxor_{}_theme_{}", session.host(), theme.theme_index),
        }
    }

    pub async fn press(&self, session: &mut ControllerSession) -> Result<()> {
        session
            .client()
            .activate_theme(self.theme_index, true)
            .await?;
        debug!(theme = self.theme_index, "theme activated");
        session.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(color_type: ColorType) -> LightGroup {
        LightGroup {
            group_number: 1,
            name: "Garden".to_string(),
            color_type,
            intensity: 50,
            hue: None,
            saturation: None,
        }
    }

    #[test]
    fn color_group_on_color_controller() {
        let g = group(ColorType::Color);
        assert_eq!(
            LightCapability::for_group(&g, ControllerFamily::ColorCapable),
            LightCapability::HueSaturation
        );
        assert_eq!(
            LightCapability::for_group(&g, ControllerFamily::TwoCapable),
            LightCapability::HueSaturation
        );
    }

    #[test]
    fn color_group_on_base_controller_is_brightness_only() {
        let g = group(ColorType::Color);
        assert_eq!(
            LightCapability::for_group(&g, ControllerFamily::Base),
            LightCapability::Brightness
        );
    }

    #[test]
    fn mono_group_is_brightness_only() {
        let g = group(ColorType::Mono);
        assert_eq!(
            LightCapability::for_group(&g, ControllerFamily::ColorCapable),
            LightCapability::Brightness
        );
    }
}
