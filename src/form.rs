use std::collections::HashMap;

use nikjin_shared::Page;
use validator::ValidationErrors;

/// Per-field messages shown next to form inputs.
#[derive(Debug, Default, Clone)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();

        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Enter a valid value.".to_owned());

                form_errors.add(&field, message);
            }
        }

        form_errors
    }
}

/// `<option>` or checkbox entry.
#[derive(Debug, Clone)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: u64,
    pub current: bool,
    pub href: String,
}

/// Pagination controls that keep the active filters in every link.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub links: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub start_index: u64,
    pub end_index: u64,
    pub count: u64,
}

impl Pagination {
    pub fn new<T>(page: &Page<T>, filters: &[(&str, &str)]) -> Self {
        let href = |number: u64| {
            let mut query = filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
                .collect::<Vec<_>>();
            query.push(format!("page={number}"));

            format!("?{}", query.join("&"))
        };

        Self {
            links: page
                .page_range()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    current: number == page.number,
                    href: href(number),
                })
                .collect(),
            previous: page
                .has_previous()
                .then(|| href(page.previous_page_number())),
            next: page.has_next().then(|| href(page.next_page_number())),
            start_index: page.start_index(),
            end_index: page.end_index(),
            count: page.count,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.links.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nikjin_shared::{PER_PAGE, Paginator};

    #[test]
    fn test_form_errors_from_validation() {
        let mut errors = ValidationErrors::new();
        nikjin_shared::add_field_error(&mut errors, "title", "required", "This field is required.");

        let form_errors = FormErrors::from(&errors);
        assert_eq!(form_errors.get("title"), ["This field is required."]);
        assert!(!form_errors.has("description"));
    }

    #[test]
    fn test_pagination_keeps_filters() {
        let page = Paginator::new(25, PER_PAGE).page(2, vec![0u8; 10]);
        let pagination = Pagination::new(&page, &[("search", "fix bug"), ("status", "")]);

        assert!(pagination.is_paginated());
        assert_eq!(pagination.previous.as_deref(), Some("?search=fix%20bug&page=1"));
        assert_eq!(pagination.next.as_deref(), Some("?search=fix%20bug&page=3"));
        assert!(pagination.links[1].current);
        assert_eq!(pagination.start_index, 11);
        assert_eq!(pagination.end_index, 20);
    }
}
