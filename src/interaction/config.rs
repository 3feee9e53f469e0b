use crate::bubble::render::ROTATE_HANDLE_OFFSET;

/// Tolerances and limits shared by the editor controller and the drawing
/// engine. All distances are canvas pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Half-size of the square hit zone around bubble resize and tip handles.
    pub handle_tolerance: f64,
    /// Hit radius of the two tail control handles.
    pub control_hit_radius: f64,
    /// Half-size of the square hit zone around overlay corners.
    pub corner_tolerance: f64,
    pub rotate_handle_offset: f64,
    pub rotate_handle_radius: f64,
    /// Smallest width/height a resize can produce.
    pub min_size: f64,
    /// Touch moves shorter than this are ignored.
    pub touch_move_threshold: f64,
    /// Undone drawing layers kept for redo.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_tolerance: 10.0,
            control_hit_radius: 12.0,
            corner_tolerance: 12.0,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            rotate_handle_radius: 10.0,
            min_size: 20.0,
            touch_move_threshold: 1.5,
            history_limit: 30,
        }
    }
}

fn parse_distance(raw: Option<String>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

impl EditorConfig {
    /// Defaults overridden by `INKPANEL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `INKPANEL_*` name. Unparseable or negative values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let distances = [
            ("INKPANEL_HANDLE_TOLERANCE", &mut cfg.handle_tolerance),
            ("INKPANEL_CONTROL_HIT_RADIUS", &mut cfg.control_hit_radius),
            ("INKPANEL_CORNER_TOLERANCE", &mut cfg.corner_tolerance),
            ("INKPANEL_MIN_SIZE", &mut cfg.min_size),
            ("INKPANEL_TOUCH_THRESHOLD", &mut cfg.touch_move_threshold),
        ];
        for (name, field) in distances {
            if let Some(v) = parse_distance(lookup(name)) {
                *field = v;
            }
        }
        if let Some(n) = lookup("INKPANEL_HISTORY_LIMIT")
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            cfg.history_limit = n;
        }
        tracing::debug!(?cfg, "editor config");
        cfg
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/config.rs"]
mod tests;
