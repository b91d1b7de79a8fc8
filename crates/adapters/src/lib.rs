// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! warden-adapters: the external-I/O boundary — credential encryption and
//! resolution, the vault client, and the AI/enrichment provider clients
//! each built against a provider-agnostic trait (§4.3, §4.5, §4.8).

pub mod ai_provider;
pub mod credential;
pub mod enrichment_provider;
pub mod vault;

pub use ai_provider::{
    AnthropicProvider, OllamaProvider, OpenAiCompatibleProvider, ProviderError, StreamingProvider,
    TokenStream,
};
pub use credential::{decrypt, encrypt, CredentialBundle, CredentialError, CredentialResolver};
pub use enrichment_provider::{
    AbuseIpDbProvider, EnrichmentError, EnrichmentProvider, EnrichmentResult, ShodanProvider,
    VirusTotalProvider,
};
pub use vault::{VaultClient, VaultError};
