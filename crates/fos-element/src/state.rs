//! State accessor
//!
//! Form controls are enabled or disabled through the `disabled` attribute;
//! every other state is the element's class name.

use crate::{Element, ElementError};

const FORM_CONTROLS: [&str; 3] = ["button", "input", "textarea"];

impl Element {
    fn is_form_control(&self) -> bool {
        let doc = self.0.document.borrow();
        doc.tag_name(self.node()).is_some_and(|tag| FORM_CONTROLS.contains(&tag))
    }

    /// Apply a state
    pub fn set_state(&self, state: &str) -> Result<(), ElementError> {
        let node = self.node();
        let control = self.is_form_control();
        let mut doc = self.0.document.borrow_mut();
        if !doc.is_element(node) {
            return Err(ElementError::NotAnElement(node));
        }

        match state {
            "disabled" if control => doc.set_attribute(node, "disabled", "")?,
            "enabled" if control => {
                doc.remove_attribute(node, "disabled")?;
            }
            _ => doc.set_class_name(node, state)?,
        }
        tracing::trace!("{} state -> {}", node, state);
        Ok(())
    }

    /// Current state; `None` when nothing is set
    pub fn state(&self) -> Option<String> {
        let control = self.is_form_control();
        let doc = self.0.document.borrow();
        let node = self.node();

        if control && doc.has_attribute(node, "disabled") {
            return Some("disabled".to_string());
        }
        match doc.class_name(node) {
            "" => None,
            class => Some(class.to_string()),
        }
    }
}
