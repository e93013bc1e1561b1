use serde::Serialize;

/// One back-office input of a coupon effect form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub input: InputKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Hidden { value: String },
    Text { value: String },
    Select { options: Vec<SelectOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl InputField {
    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            input: InputKind::Hidden {
                value: value.into(),
            },
        }
    }

    pub fn text(
        name: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input: InputKind::Text {
                value: value.into(),
            },
        }
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input: InputKind::Select { options },
        }
    }

    /// Currently selected option of a select input
    pub fn selected(&self) -> Option<&SelectOption> {
        match &self.input {
            InputKind::Select { options } => options.iter().find(|o| o.selected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let field = InputField::select(
            "product_sale_element_id",
            "Product",
            vec![SelectOption {
                value: "42".to_string(),
                label: "Mug (MUG-RED)".to_string(),
                selected: true,
            }],
        );

        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({
                "name": "product_sale_element_id",
                "label": "Product",
                "type": "select",
                "options": [{"value": "42", "label": "Mug (MUG-RED)", "selected": true}]
            })
        );
        assert_eq!(field.selected().map(|o| o.value.as_str()), Some("42"));
    }

    #[test]
    fn test_hidden_has_no_selection() {
        let field = InputField::hidden("amount", "0");
        assert!(field.selected().is_none());
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"name": "amount", "label": "", "type": "hidden", "value": "0"})
        );
    }
}
