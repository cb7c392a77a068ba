// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Narrative: scenario path navigation over step tables and nested scenario trees.
//!
//! A [`navigator::Navigator`] keeps one root-to-leaf selection path over a
//! [`source::DataSource`], auto-descending on every selection and publishing confirmed paths
//! to a [`store::HandoffStore`] that other views read. The [`mcp`] module serves all of it
//! over the Model Context Protocol.

pub mod chat;
pub mod mcp;
pub mod model;
pub mod navigator;
pub mod ops;
pub mod query;
pub mod shelf;
pub mod source;
pub mod store;
