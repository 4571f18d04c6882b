// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for the resonance kernel.
///
/// Every variant is raised at construction time, before any stepping.
/// Divergent trajectories are not errors; they show up in the growth
/// ratio and energy diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResonanceError {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Explicit wave scheme would be unstable.
    #[error(
        "stability error: Courant number {courant:.4} exceeds 1/sqrt({dims}) = {limit:.4}"
    )]
    Stability {
        courant: f64,
        limit: f64,
        dims: usize,
    },

    /// Malformed grid shape or node coordinates.
    #[error("grid error: {0}")]
    Grid(String),
}

pub type ResonanceResult<T> = Result<T, ResonanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stability_message_names_dims() {
        let err = ResonanceError::Stability {
            courant: 0.8,
            limit: 1.0 / 2f64.sqrt(),
            dims: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("0.8000"), "{msg}");
        assert!(msg.contains("sqrt(2)"), "{msg}");
    }

    #[test]
    fn test_config_message() {
        let err = ResonanceError::Config("q0 must be > 0, got 0".into());
        assert_eq!(err.to_string(), "config error: q0 must be > 0, got 0");
    }
}
