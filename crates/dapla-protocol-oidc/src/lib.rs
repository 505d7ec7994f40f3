//! # dapla-protocol-oidc
//!
//! The `OpenID` Connect protocol mapper SPI the Dapla mappers plug into.
//!
//! ## Modules
//!
//! - [`claims`] - access and ID token claim types mappers write into
//! - [`error`] - mapper error types
//! - [`mapper`] - mapper traits, configuration and the mapper registry

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod error;
pub mod mapper;

pub use claims::{AccessTokenClaims, ClaimMap, IdTokenClaims};
pub use error::{BoxError, MapperError, MapperResult};
pub use mapper::{
    AccessTokenMapper, ClaimMapper, ConfigProperty, ConfigPropertyType, IdTokenMapper,
    MapperConfig, MapperContext, ProtocolMapper, ProtocolMapperRegistry, TOKEN_MAPPER_CATEGORY,
    UserInfo, UserInfoMapper, claim_name_property, include_in_tokens_properties,
};
