// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;
use super::option::FlatOption;
use super::tree::TreeNode;

/// Borrowed view of a node from either source shape.
///
/// The two shapes carry different display fields; everything the navigator needs is exposed
/// here so callers never branch on the shape themselves.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Option(&'a FlatOption),
    Tree(&'a TreeNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        match *self {
            Self::Option(option) => option.id(),
            Self::Tree(node) => node.id(),
        }
    }

    /// Title of a flat option, name of a tree node.
    pub fn display_name(&self) -> &'a str {
        match *self {
            Self::Option(option) => option.title(),
            Self::Tree(node) => node.name(),
        }
    }

    pub fn subtitle(&self) -> &'a str {
        match *self {
            Self::Option(option) => option.subtitle(),
            Self::Tree(node) => node.index_name(),
        }
    }

    pub fn description(&self) -> &'a str {
        match *self {
            Self::Option(option) => option.desc(),
            Self::Tree(node) => node.description(),
        }
    }

    /// Only flat options carry a probability weight.
    pub fn probability(&self) -> Option<u8> {
        match *self {
            Self::Option(option) => Some(option.probability()),
            Self::Tree(_) => None,
        }
    }

    pub fn as_option(&self) -> Option<&'a FlatOption> {
        match *self {
            Self::Option(option) => Some(option),
            Self::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&'a TreeNode> {
        match *self {
            Self::Option(_) => None,
            Self::Tree(node) => Some(node),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for NodeRef<'_> {}
