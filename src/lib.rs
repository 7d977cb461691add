//! Kinetic search – turns a submitted search form into a search url.
//!
//! A Kinetic search page posts a form made of three kinds of fields:
//! * *Control fields* with reserved names (`_class_key`, `_domain`, `_path`,
//!   `_type`, `_limit`, `_order_by`, `_sort_order`, `search`) that shape the url.
//! * *Value fields*, one per searchable attribute, e.g. `name` or `age`.
//! * *Metadata fields* `_<attribute>_logical` and `_<attribute>_comp` that pick
//!   the logical (AND/OR) and comparison (=, LIKE, BETWEEN, ...) operator for an
//!   attribute. They never show up in the url themselves.
//!
//! The [`serializer::FormQuerySerializer`] folds value fields and their
//! operators into a predicate string such as `name = "Alice", age BETWEEN
//! ["18", "65"]` and embeds it, escaped, in a url of the shape
//! `<domain><path><class>/search/STRING/<predicates>/limit/<n>/order_by/<f>/sort_order/<d>`.
//!
//! ## Modules
//! * [`form`] – The submitted form: [`form::FormData`] and the tagged [`form::Field`] value.
//! * [`predicate`] – Metadata field names, per-form operator tables and predicates.
//! * [`escape`] – Percent-escaping of path segments.
//! * [`serializer`] – The url builder.
//! * [`settings`] – Control names and serializer options, loaded with `config`.
//! * [`server`] – HTTP endpoint that redirects browser form posts to their search url.
//!
//! ## Quick Start
//! ```
//! use kinetic::form::FormData;
//! use kinetic::serializer::FormQuerySerializer;
//! let form = FormData::new()
//!     .with("_class_key", "Person")
//!     .with("_domain", "http://h/")
//!     .with("_path", "/api/")
//!     .with("name", "Alice");
//! let url = FormQuerySerializer::default().build_url(&form).unwrap();
//! assert_eq!(url, "http://h//api/Person/search/STRING/name%20%22Alice%22");
//! ```
//!
//! ## Configuration
//! Control names, the search prefix (`/search/STRING/` or `/squery/`), quote
//! escaping and the escaping alphabet are all settings, see [`settings::Settings`].

pub mod error;
pub mod escape;
pub mod form;
pub mod predicate;
pub mod serializer;
pub mod server;
pub mod settings;

pub use error::{KineticError, Result};
pub use form::{Field, FormData, FormField};
pub use serializer::{FormQuerySerializer, Submission};
pub use settings::Settings;
