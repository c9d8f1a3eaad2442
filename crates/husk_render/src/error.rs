//! Render error types

use thiserror::Error;

/// Render-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A component rendering as a Fragment was given props it cannot forward
    #[error("{}", fragment_props_message(.component, .keys))]
    FragmentProps {
        /// Display name of the component being rendered
        component: String,
        /// Every prop and data attribute that could not be forwarded
        keys: Vec<String>,
    },
}

fn fragment_props_message(component: &str, keys: &[String]) -> String {
    let mut lines = vec![
        "Cannot forward props through a Fragment".to_string(),
        String::new(),
        format!("<{component} /> renders as a Fragment, but these props need an element to land on:"),
    ];
    lines.extend(keys.iter().map(|key| format!("  - {key}")));
    lines.push(String::new());
    lines.push("Possible fixes:".to_string());
    lines.push("  - Give the component an explicit `as` tag so it renders a real element instead of a Fragment.".to_string());
    lines.push("  - Pass exactly one child element so the props can be forwarded onto it.".to_string());
    lines.join("\n")
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_props_message() {
        let err = RenderError::FragmentProps {
            component: "Button".into(),
            keys: vec!["className".into(), "data-hover".into()],
        };
        let message = err.to_string();

        assert!(message.contains("<Button />"));
        assert!(message.contains("\n  - className\n"));
        assert!(message.contains("\n  - data-hover\n"));
        assert!(message.contains("explicit `as` tag"));
        assert!(message.contains("exactly one child element"));
    }
}
