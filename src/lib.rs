// Copyright 2025-2026 the trimscope authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # trimscope
//!
//! A trace-guided post-processing deobfuscator for managed (.NET CIL)
//! assemblies produced by a commercial name-obfuscator. Given an assembly's
//! in-memory object model and the list of methods observed executing during
//! one or more runtime traces, `trimscope` rewrites the assembly so a
//! decompiler has less noise to wade through:
//!
//! - **String folding** — the obfuscator inlines an XOR-based string
//!   decryption pattern at every call site. The folder recognizes the
//!   5-instruction byte-array setup idiom, reconstructs both arrays from
//!   static field initializer blobs, performs the XOR, and replaces the
//!   whole construction with a single `ldstr` of the plaintext.
//! - **Liveness** — a worklist-driven reachability analysis over method and
//!   type metadata computes which methods and types are reachable from the
//!   execution trace plus the module's public surface.
//! - **Dead-code normalization** — dead method bodies are blanked to a
//!   minimal `default; ret` sequence, each type's method list is reordered
//!   so live methods come first, and dead methods and types receive short
//!   synthetic names (`Method_{n}`, `Type_{n}`) with stable numbering.
//!
//! The output assembly is intended only for static analysis; it is not
//! required to load or execute.
//!
//! # Architecture
//!
//! - [`crate::metadata`] - Mutable assembly object model: modules, types,
//!   methods, fields, bodies
//! - [`crate::assembly`] - CIL instruction representation and opcode
//!   classification
//! - [`crate::analysis`] - Reachability analysis producing live sets
//! - [`crate::deobfuscation`] - The rewrite passes and the pipeline engine
//! - [`crate::trace`] - Execution-log (trace) loading
//! - [`crate::Error`] and [`crate::Result`] - Error handling
//!
//! # Usage
//!
//! ```rust,no_run
//! use trimscope::prelude::*;
//!
//! // The assembly object model is populated by an external loader; here we
//! // assume `module` already holds the obfuscated assembly.
//! # let mut module = Module::new("Game.dll");
//! let roots = trimscope::trace::load_roots("executed_methods.log")?;
//! let result = trimscope::clean(&mut module, &roots);
//! println!("{}", result.summary);
//! # Ok::<(), trimscope::Error>(())
//! ```
//!
//! What happens physically before and after — reading the obfuscated file
//! into the object model and writing the rewritten assembly back out — is
//! the job of the embedding application and its assembly I/O library.

pub mod analysis;
pub mod assembly;
pub mod deobfuscation;
pub mod metadata;
pub mod prelude;
pub mod trace;

mod error;

pub use deobfuscation::{clean, CleanResult, CleanSummary};
pub use error::{Error, Result};
