//! End-to-end tests for the Dapla protocol mappers live under `tests/`.
