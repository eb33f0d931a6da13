#![forbid(unsafe_code)]

//! Core: geometry, pointer events, drag recognition, and animation.
//!
//! # Role in Soroban
//! `soroban-core` is the input layer. It owns the normalized pointer event
//! type, the drag recognizer that turns raw pointer samples into a drag
//! lifecycle, the `f64` geometry used for hit testing, and the spring used to
//! glide beads during non-interactive transitions.
//!
//! # How it fits in the system
//! `soroban-model` depends only on [`geometry`] for its offset arithmetic.
//! `soroban-widgets` consumes [`event::PointerEvent`] and
//! [`gesture::DragEvent`] values and drives the model with them.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
