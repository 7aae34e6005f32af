//! Animatable properties and the composed inline style they produce.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    /// Horizontal translation as a percentage of the element's own width.
    XPercent,
    /// Vertical translation as a percentage of the element's own height.
    YPercent,
    Scale,
    RotateX,
    RotateY,
    Opacity,
    /// Accent colour mix for text, 0 (none) to 1 (full accent + glow).
    Glow,
    DashOffset,
    WidthPercent,
}

impl Prop {
    pub fn is_transform(self) -> bool {
        matches!(
            self,
            Prop::X
                | Prop::Y
                | Prop::XPercent
                | Prop::YPercent
                | Prop::Scale
                | Prop::RotateX
                | Prop::RotateY
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleState {
    pub x: f64,
    pub y: f64,
    pub x_percent: f64,
    pub y_percent: f64,
    pub scale: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub perspective: Option<f64>,
    pub opacity: Option<f64>,
    pub glow: Option<f64>,
    pub dash_offset: Option<f64>,
    pub width_percent: Option<f64>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            perspective: None,
            opacity: None,
            glow: None,
            dash_offset: None,
            width_percent: None,
        }
    }
}

impl StyleState {
    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::XPercent => self.x_percent,
            Prop::YPercent => self.y_percent,
            Prop::Scale => self.scale,
            Prop::RotateX => self.rotate_x,
            Prop::RotateY => self.rotate_y,
            Prop::Opacity => self.opacity.unwrap_or(1.0),
            Prop::Glow => self.glow.unwrap_or(0.0),
            Prop::DashOffset => self.dash_offset.unwrap_or(0.0),
            Prop::WidthPercent => self.width_percent.unwrap_or(0.0),
        }
    }

    pub fn set(&mut self, prop: Prop, value: f64) {
        match prop {
            Prop::X => self.x = value,
            Prop::Y => self.y = value,
            Prop::XPercent => self.x_percent = value,
            Prop::YPercent => self.y_percent = value,
            Prop::Scale => self.scale = value,
            Prop::RotateX => self.rotate_x = value,
            Prop::RotateY => self.rotate_y = value,
            Prop::Opacity => self.opacity = Some(value),
            Prop::Glow => self.glow = Some(value),
            Prop::DashOffset => self.dash_offset = Some(value),
            Prop::WidthPercent => self.width_percent = Some(value),
        }
    }

    /// CSS `transform` value. Identity parts are left out so untouched
    /// elements end up with `none`.
    pub fn transform_css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(p) = self.perspective {
            parts.push(format!("perspective({}px)", fmt(p)));
        }
        if self.x_percent != 0.0 || self.y_percent != 0.0 {
            parts.push(format!(
                "translate({}%, {}%)",
                fmt(self.x_percent),
                fmt(self.y_percent)
            ));
        }
        if self.x != 0.0 || self.y != 0.0 {
            parts.push(format!("translate3d({}px, {}px, 0px)", fmt(self.x), fmt(self.y)));
        }
        if self.rotate_y != 0.0 {
            parts.push(format!("rotateY({}deg)", fmt(self.rotate_y)));
        }
        if self.rotate_x != 0.0 {
            parts.push(format!("rotateX({}deg)", fmt(self.rotate_x)));
        }
        if self.scale != 1.0 {
            parts.push(format!("scale({})", fmt(self.scale)));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// `(color, text-shadow)` for the current glow, `None` when there is none.
    pub fn glow_css(&self) -> Option<(String, String)> {
        let glow = self.glow.filter(|g| *g > 0.0)?.min(1.0);
        Some((
            format!(
                "color-mix(in srgb, #00A0E3 {}%, currentcolor)",
                fmt(glow * 100.0)
            ),
            format!("0 2px 8px rgba(112, 213, 255, {})", fmt(glow)),
        ))
    }
}

fn fmt(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoids "-0"
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_state_has_no_transform() {
        assert_eq!(StyleState::default().transform_css(), "none");
        assert_eq!(StyleState::default().glow_css(), None);
    }

    #[test]
    fn transform_parts_are_ordered() {
        let mut state = StyleState::default();
        state.perspective = Some(800.0);
        state.set(Prop::YPercent, 30.0);
        state.set(Prop::X, 12.5);
        state.set(Prop::RotateX, -3.0);
        state.set(Prop::RotateY, 2.0);
        state.set(Prop::Scale, 1.1);
        assert_eq!(
            state.transform_css(),
            "perspective(800px) translate(0%, 30%) translate3d(12.5px, 0px, 0px) rotateY(2deg) rotateX(-3deg) scale(1.1)"
        );
    }

    #[test]
    fn values_are_rounded() {
        let mut state = StyleState::default();
        state.set(Prop::Y, 1.0 / 3.0);
        state.set(Prop::X, -0.0001);
        assert_eq!(state.transform_css(), "translate3d(0px, 0.333px, 0px)");
    }

    #[test]
    fn optional_props_default_to_neutral() {
        let state = StyleState::default();
        assert_eq!(state.get(Prop::Opacity), 1.0);
        assert_eq!(state.get(Prop::Scale), 1.0);
        assert_eq!(state.get(Prop::Glow), 0.0);
    }

    #[test]
    fn glow_maps_to_colour_and_shadow() {
        let mut state = StyleState::default();
        state.set(Prop::Glow, 0.5);
        let (color, shadow) = state.glow_css().unwrap();
        assert_eq!(color, "color-mix(in srgb, #00A0E3 50%, currentcolor)");
        assert_eq!(shadow, "0 2px 8px rgba(112, 213, 255, 0.5)");
    }
}
