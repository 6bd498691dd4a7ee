//! Loading configuration files from disk.

use gesture_link::{GestureConfig, GestureError, TokenMode};
use std::io::Write;

#[test]
fn test_loads_json_with_defaults() -> Result<(), GestureError> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{
            "listener": {{ "port": 5000, "token_mode": "delimited" }},
            "motion": {{ "move_speed": 7.5 }}
        }}"#
    )?;

    // Everything not in the file falls back to defaults
    let config = GestureConfig::from_json_file(file.path())?;
    assert_eq!(config.listener.port, 5000);
    assert_eq!(config.listener.token_mode, TokenMode::Delimited);
    assert_eq!(config.motion.move_speed, 7.5);
    assert_eq!(config.motion.jump_force, 10.0);
    assert_eq!(config.host.tick_rate_hz, 60);
    Ok(())
}

#[test]
fn test_malformed_json_is_serde_error() -> Result<(), GestureError> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{{ listener: ")?;

    assert!(matches!(
        GestureConfig::from_json_file(file.path()),
        Err(GestureError::Serde(_))
    ));
    Ok(())
}

#[test]
fn test_out_of_range_values_rejected() -> Result<(), GestureError> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{ "listener": {{ "read_chunk_size": 0 }} }}"#)?;

    assert!(matches!(
        GestureConfig::from_json_file(file.path()),
        Err(GestureError::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = GestureConfig::from_json_file("/nonexistent/gesture-link.json");
    assert!(matches!(result, Err(GestureError::Io(_))));
}
