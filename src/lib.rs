//! Workspace-level integration tests for fibengine. See `tests/`.
