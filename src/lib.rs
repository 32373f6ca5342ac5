//! AOT native metadata extractor - GraalVM native-image configuration from a live container.
//!
//! This library starts an application once in AOT mode, walks the beans and method
//! definitions of its dependency-injection container, and writes the configuration a
//! native-image build needs: which classes, constructors, methods and fields stay
//! reflectively accessible, which resources are embedded, which classes need serialization
//! support, and which proxy classes must be generated ahead of time.
//!
//! # Architecture
//!
//! 1. [`application`] - The application being processed and how it is resolved by name
//! 2. [`container`] - The bean and method registry the application populates
//! 3. [`processor`] - Traverses the container and derives hints per bean and method
//! 4. [`proxy`] - Generates proxy sources for intercepted beans
//! 5. [`metadata`] - Accumulates hints and renders them as JSON
//! 6. [`scanner`] - Enumerates classpath resources matching the resource patterns
//! 7. [`emitter`] - Writes the configuration files
//! 8. [`aot_processor`] - Runs the whole extraction
//!
//! # Example Usage
//!
//! ```no_run
//! use aot_native_metadata::{
//!     aot_processor::AotProcessor,
//!     application::ApplicationCatalog,
//!     settings::Settings,
//! };
//! use std::path::PathBuf;
//!
//! let settings = Settings::new(
//!     PathBuf::from("target/classes"),
//!     PathBuf::from("target/generated-sources"),
//!     "com.example",
//!     "demo",
//! );
//! let application = ApplicationCatalog::new().resolve("app.yaml").unwrap();
//!
//! let summary = AotProcessor::new(settings, Vec::new(), application)
//!     .process()
//!     .unwrap();
//! println!("Processed {} beans", summary.beans_processed);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod aot_processor;
pub mod application;
pub mod cli;
pub mod container;
pub mod context;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod metadata;
pub mod processor;
pub mod proxy;
pub mod scanner;
pub mod serializer;
pub mod settings;
