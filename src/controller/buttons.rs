//! Named button records and primary-button resolution.

use tracing::debug;

use crate::catalog::ControllerSchema;
use crate::host::RawButton;

/// One tracked button: last-seen analog value plus touch/press state.
#[derive(Debug, Clone)]
pub struct TrackedButton {
    name: String,
    pub(crate) value: f32,
    pub(crate) touched: bool,
    pub(crate) pressed: bool,
    pub(crate) primary: bool,
}

impl TrackedButton {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

/// Builds the tracked button list for a device.
///
/// Schema names apply positionally; raw records past the schema's list (or
/// all records when no schema matched) get generic `button_N` names. State is
/// primed from the construction-time snapshot so the first poll over the same
/// data emits nothing.
pub(crate) fn build_buttons(
    raw: &[RawButton],
    schema: Option<&ControllerSchema>,
) -> Vec<TrackedButton> {
    let mut buttons: Vec<TrackedButton> = raw
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let name = schema
                .and_then(|s| s.buttons.get(index))
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("button_{}", index));
            TrackedButton {
                name,
                value: record.value,
                touched: record.touched,
                pressed: record.pressed,
                primary: false,
            }
        })
        .collect();

    if buttons.is_empty() {
        return buttons;
    }

    // Primary resolution: the schema's designated button when present,
    // otherwise the trigger position (index 1) on multi-button devices,
    // otherwise the only button there is.
    let primary_index = schema
        .and_then(|s| s.primary)
        .and_then(|name| buttons.iter().position(|b| b.name == name))
        .unwrap_or_else(|| if buttons.len() > 1 { 1 } else { 0 });
    buttons[primary_index].primary = true;
    debug!(
        "Primary button resolved to \"{}\" (index {})",
        buttons[primary_index].name, primary_index
    );

    buttons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CapabilityCatalog;

    fn raw(n: usize) -> Vec<RawButton> {
        vec![RawButton::default(); n]
    }

    #[test]
    fn single_button_without_schema_is_primary() {
        let buttons = build_buttons(&raw(1), None);
        assert_eq!(buttons[0].name(), "button_0");
        assert!(buttons[0].is_primary());
    }

    #[test]
    fn trigger_position_is_primary_without_schema() {
        let buttons = build_buttons(&raw(4), None);
        let primaries: Vec<usize> = buttons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_primary())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(primaries, vec![1]);
    }

    #[test]
    fn schema_primary_name_wins() {
        let catalog = CapabilityCatalog::builtin();
        let schema = catalog.lookup("OpenVR Gamepad").unwrap();
        let buttons = build_buttons(&raw(4), Some(schema));
        assert_eq!(buttons[0].name(), "thumbpad");
        assert_eq!(buttons[1].name(), "trigger");
        assert!(buttons[1].is_primary());
        assert_eq!(buttons.iter().filter(|b| b.is_primary()).count(), 1);
    }

    #[test]
    fn extra_buttons_beyond_schema_get_generic_names() {
        let catalog = CapabilityCatalog::builtin();
        let schema = catalog.lookup("Daydream Controller").unwrap();
        let buttons = build_buttons(&raw(3), Some(schema));
        assert_eq!(buttons[0].name(), "thumbpad");
        assert_eq!(buttons[1].name(), "button_1");
        assert_eq!(buttons[2].name(), "button_2");
    }

    #[test]
    fn no_buttons_means_no_primary() {
        assert!(build_buttons(&raw(0), None).is_empty());
    }
}
