// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy validation failed: {0}")]
    Validation(String),

    #[error("no policy with id '{0}' in this room")]
    NotFound(String),

    #[error("failed to read policy document at {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write policy document at {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed policy document: {0}")]
    Malformed(#[from] serde_json::Error),
}
