//! Builds the search url for a submitted form.
//!
//! ```text
//! <domain><path><class key>/search/STRING/<escaped predicates>
//!     [/limit/<n>] [/order_by/<field>[/sort_order/<dir>]] [?_type=<type>]
//! ```
//!
//! The serializer holds only its configuration; everything derived from a
//! form is local to the call, so one instance can serve any number of
//! concurrent requests.

use tracing::debug;

use crate::error::{KineticError, Result};
use crate::escape::escape;
use crate::form::{FormData, is_blank};
use crate::predicate::{SearchPredicate, predicate_string, search_predicates};
use crate::settings::{ControlNames, SerializerOptions, Settings};

/// What to do with a built url: follow it, or just show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Navigate(String),
    DryRun(String),
}

impl Submission {
    pub fn url(&self) -> &str {
        match self {
            Submission::Navigate(url) | Submission::DryRun(url) => url,
        }
    }
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Submission::DryRun(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormQuerySerializer {
    names: ControlNames,
    options: SerializerOptions,
}

impl FormQuerySerializer {
    pub fn new(names: ControlNames, options: SerializerOptions) -> Self {
        Self { names, options }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.names.clone(), settings.options.clone())
    }

    pub fn names(&self) -> &ControlNames {
        &self.names
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Builds the complete search url. Fails only when the class key, domain
    /// or path control is missing from the form.
    pub fn build_url(&self, form: &FormData) -> Result<String> {
        let class_key = self.required(form, &self.names.class_key, "class key")?;
        let domain = self.required(form, &self.names.domain, "domain")?;
        let path = self.required(form, &self.names.path, "path")?;
        let output_type = self.optional(form, &self.names.output_type);
        let limit = self.optional(form, &self.names.limit);
        let order_by = self.optional(form, &self.names.order_by);
        let sort_order = self.optional(form, &self.names.sort_order);

        let search = self.build_search_predicate_string(form);

        let mut url = format!("{domain}{path}{}{class_key}", self.options.class_key_prefix);
        url.push_str(&self.append_path_segment(&self.names.search, &search));
        url.push_str(&self.append_path_segment(&self.names.limit, limit));
        url.push_str(&self.append_path_segment(&self.names.order_by, order_by));
        if !is_blank(order_by) {
            url.push_str(&self.append_path_segment(&self.names.sort_order, sort_order));
        }
        if !is_blank(output_type) {
            url.push('?');
            url.push_str(&self.options.output_type_param);
            url.push('=');
            url.push_str(&escape(output_type, self.options.escaping));
        }
        debug!(%url, "search url built");
        Ok(url)
    }

    /// Builds the url and wraps it according to `dry_run`.
    pub fn submit(&self, form: &FormData, dry_run: bool) -> Result<Submission> {
        let url = self.build_url(form)?;
        Ok(if dry_run { Submission::DryRun(url) } else { Submission::Navigate(url) })
    }

    pub fn search_predicates(&self, form: &FormData) -> Vec<SearchPredicate> {
        search_predicates(form, &self.names)
    }

    /// The unescaped predicate string. With `free_text_search` enabled, a
    /// form without predicates falls back to the text of its `search` control.
    pub fn build_search_predicate_string(&self, form: &FormData) -> String {
        let predicates = self.search_predicates(form);
        let search = predicate_string(&predicates, self.options.escape_embedded_quotes);
        if !search.is_empty() || !self.options.free_text_search {
            return search;
        }
        match form.get(&self.names.search).and_then(|f| f.value.scalar()) {
            Some(text) if !is_blank(text) => text.to_string(),
            _ => search,
        }
    }

    /// One `/<name>/<value>` path segment, with special cases for the search
    /// segment (never omitted) and a zero limit (omitted).
    pub fn append_path_segment(&self, name: &str, value: &str) -> String {
        let escaping = self.options.escaping;
        if name == self.names.search {
            let value = if is_blank(value) { self.options.null_marker.as_str() } else { value };
            return format!("{}{}", self.options.search_prefix, escape(value, escaping));
        }
        if name == self.names.limit && is_zero(value) {
            return String::new();
        }
        if is_blank(value) {
            return String::new();
        }
        format!("/{}/{}", self.segment_label(name), escape(value, escaping))
    }

    fn segment_label<'a>(&'a self, name: &'a str) -> &'a str {
        if name == self.names.limit {
            &self.options.limit_segment
        } else if name == self.names.order_by {
            &self.options.order_by_segment
        } else if name == self.names.sort_order {
            &self.options.sort_order_segment
        } else {
            name
        }
    }

    fn required<'f>(&self, form: &'f FormData, name: &str, role: &'static str) -> Result<&'f str> {
        form.get(name)
            .map(|f| f.value.scalar().unwrap_or(""))
            .ok_or_else(|| KineticError::MissingControlField { role, name: name.to_string() })
    }

    fn optional<'f>(&self, form: &'f FormData, name: &str) -> &'f str {
        form.get(name).and_then(|f| f.value.scalar()).unwrap_or("")
    }
}

// A blank limit counts as zero as well.
fn is_zero(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.parse::<f64>().is_ok_and(|n| n == 0.0)
}
