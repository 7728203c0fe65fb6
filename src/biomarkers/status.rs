use serde::{Deserialize, Serialize};

/// Qualitative status of a single lab reading against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiomarkerStatus {
    Optimal,
    Warning,
    Danger,
    /// No value, or no range to compare it against.
    None,
}

impl BiomarkerStatus {
    /// Class name the presentation layer attaches to the input wrapper.
    pub fn css_class(&self) -> &'static str {
        match self {
            BiomarkerStatus::Optimal => "status-ok",
            BiomarkerStatus::Warning => "status-warning",
            BiomarkerStatus::Danger => "status-danger",
            BiomarkerStatus::None => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BiomarkerStatus::Optimal => "optimal",
            BiomarkerStatus::Warning => "warning",
            BiomarkerStatus::Danger => "danger",
            BiomarkerStatus::None => "none",
        }
    }
}

/// Maps a reading onto optimal / warning / danger.
///
/// Three range shapes are understood:
/// * inverse markers (higher is worse): `[ok_max, warning_max]`
/// * regular four-point ranges: `[warning_low, ok_low, ok_high, warning_high]`
/// * legacy two-point ranges (lower is worse): `[ok, warning]`
///
/// The inverse branch compares with strict `>` while the legacy branch uses `>=`
/// at the optimal boundary. Both are kept as-is.
pub fn evaluate_status(value: Option<f64>, range: Option<&[f64]>, inverse: bool) -> BiomarkerStatus {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return BiomarkerStatus::None,
    };
    let range = match range {
        Some(r) => r,
        None => return BiomarkerStatus::None,
    };

    if inverse {
        let (ok_max, warning_max) = match range {
            [ok_max, warning_max, ..] => (*ok_max, *warning_max),
            _ => return BiomarkerStatus::None,
        };
        if value > warning_max {
            return BiomarkerStatus::Danger;
        }
        if value > ok_max {
            return BiomarkerStatus::Warning;
        }
        return BiomarkerStatus::Optimal;
    }

    if let [warning_low, ok_low, ok_high, warning_high] = range {
        if value < *warning_low || value > *warning_high {
            return BiomarkerStatus::Danger;
        }
        if value < *ok_low || value > *ok_high {
            return BiomarkerStatus::Warning;
        }
        return BiomarkerStatus::Optimal;
    }

    // Fallback for old 2-value ranges (or misconfigured ones with 3 or 5+ values).
    let (ok, warning) = match range {
        [ok, warning, ..] => (*ok, *warning),
        _ => return BiomarkerStatus::None,
    };
    if value >= ok {
        BiomarkerStatus::Optimal
    } else if value >= warning {
        BiomarkerStatus::Warning
    } else {
        BiomarkerStatus::Danger
    }
}
