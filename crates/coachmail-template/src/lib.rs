//! # coachmail-template
//!
//! Mustache-style renderer for coaching-center mail templates. Supports
//! `{{key}}` and `{{obj.field}}` interpolation, `{{#if}}`, inverted `{{^key}}`
//! and bare `{{key}}...{{/key}}` conditionals, and `{{#each}}` loops.
//!
//! ```
//! use coachmail_template::{Data, Engine};
//!
//! let engine = Engine::new();
//! engine.add_template(
//!     "balance",
//!     "Hello {{name}}, balance: {{currency}}{{amount}}{{#if overdue}} (OVERDUE){{/if}}",
//! );
//! let data = Data::new().with("name", "Ravi").with("amount", 500).with("overdue", true);
//! assert_eq!(
//!     engine.render_named("balance", &data).unwrap(),
//!     "Hello Ravi, balance: ₹500 (OVERDUE)"
//! );
//! ```

pub mod builtin;
pub mod context;
pub mod defaults;
pub mod engine;
pub mod lexer;
pub mod loaders;
pub mod parser;
pub mod render;

pub use context::{Data, Value};
pub use defaults::DefaultContext;
pub use engine::Engine;
pub use render::render;
