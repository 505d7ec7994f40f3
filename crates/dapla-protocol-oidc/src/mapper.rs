//! Protocol Mapper SPI for adding custom claims to OIDC tokens.
//!
//! ## Design
//!
//! - [`ProtocolMapper`] describes a mapper type (ID, display metadata, config properties)
//! - [`MapperConfig`] is one configured instance of a mapper type
//! - [`ClaimMapper`] computes a single claim value; every `ClaimMapper` is
//!   automatically an [`AccessTokenMapper`], [`IdTokenMapper`] and [`UserInfoMapper`]
//! - [`ProtocolMapperRegistry`] holds mapper types and applies configured
//!   instances to token claims
//!
//! A mapper that cannot compute its value either returns `Ok(None)` (nothing
//! is written) or an error. What happens to errors is decided by the
//! registry's [`ClaimFailurePolicy`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use dapla_protocol_oidc::mapper::{ClaimMapper, ConfigProperty, MapperConfig, MapperContext, ProtocolMapper};
//!
//! struct RealmNameMapper;
//!
//! impl ProtocolMapper for RealmNameMapper {
//!     fn id(&self) -> &'static str { "realm-name-mapper" }
//!     fn display_name(&self) -> &'static str { "Realm name" }
//!     fn category(&self) -> &'static str { "Token mapper" }
//!     fn config_properties(&self) -> Vec<ConfigProperty> { vec![claim_name_property()] }
//! }
//!
//! impl ClaimMapper for RealmNameMapper {
//!     fn map_claim(
//!         &self,
//!         _config: &MapperConfig,
//!         context: &MapperContext<'_>,
//!     ) -> MapperResult<Option<serde_json::Value>> {
//!         Ok(Some(context.realm.into()))
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use dapla_core::ClaimFailurePolicy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claims::{AccessTokenClaims, ClaimMap, IdTokenClaims};
use crate::error::MapperResult;

/// Configuration keys understood by every claim mapper.
pub mod keys {
    /// Name of the claim the mapper writes.
    pub const CLAIM_NAME: &str = "claim.name";
    /// Whether the claim is added to access tokens.
    pub const ACCESS_TOKEN_CLAIM: &str = "access.token.claim";
    /// Whether the claim is added to ID tokens.
    pub const ID_TOKEN_CLAIM: &str = "id.token.claim";
    /// Whether the claim is added to userinfo responses.
    pub const USERINFO_TOKEN_CLAIM: &str = "userinfo.token.claim";
}

/// Display category shared by all token mappers.
pub const TOKEN_MAPPER_CATEGORY: &str = "Token mapper";

/// Configuration for a protocol mapper instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Unique identifier for this mapper instance.
    pub id: Uuid,

    /// Mapper name (user-defined).
    pub name: String,

    /// Protocol mapper type ID (e.g., `"oidc-dapla-short-username-mapper"`).
    pub mapper_type: String,

    /// Protocol (always `"openid-connect"`).
    pub protocol: String,

    /// Configuration key-value pairs.
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl MapperConfig {
    /// Creates a new mapper configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, mapper_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            mapper_type: mapper_type.into(),
            protocol: "openid-connect".to_string(),
            config: HashMap::new(),
        }
    }

    /// Sets a configuration value.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Gets a configuration value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a configuration value, treating blank values as absent.
    #[must_use]
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Gets a configuration value as a boolean.
    ///
    /// Accepts `true`/`false` in any case. Anything else is treated as absent.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Checks if the mapper should be included in access tokens.
    #[must_use]
    pub fn include_in_access_token(&self) -> bool {
        self.get_bool(keys::ACCESS_TOKEN_CLAIM).unwrap_or(true)
    }

    /// Checks if the mapper should be included in ID tokens.
    #[must_use]
    pub fn include_in_id_token(&self) -> bool {
        self.get_bool(keys::ID_TOKEN_CLAIM).unwrap_or(true)
    }

    /// Checks if the mapper should be included in userinfo responses.
    #[must_use]
    pub fn include_in_userinfo(&self) -> bool {
        self.get_bool(keys::USERINFO_TOKEN_CLAIM).unwrap_or(true)
    }

    /// Gets the claim name to use in tokens.
    #[must_use]
    pub fn claim_name(&self) -> Option<&str> {
        self.get_non_blank(keys::CLAIM_NAME)
    }
}

/// Configuration property definition for mapper UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    /// Property name (config key).
    pub name: String,

    /// Display label.
    pub label: String,

    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// Property type.
    pub property_type: ConfigPropertyType,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Whether the property is required.
    #[serde(default)]
    pub required: bool,

    /// Options for list types.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}

/// Configuration property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigPropertyType {
    /// Text input.
    String,
    /// Boolean checkbox.
    Boolean,
    /// Select dropdown.
    List,
}

impl ConfigProperty {
    fn of_type(
        name: impl Into<String>,
        label: impl Into<String>,
        property_type: ConfigPropertyType,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            help_text: None,
            property_type,
            default_value: None,
            required: false,
            options: vec![],
        }
    }

    /// Creates a new string property.
    #[must_use]
    pub fn string(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::of_type(name, label, ConfigPropertyType::String)
    }

    /// Creates a new boolean property, defaulting to `false`.
    #[must_use]
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::of_type(name, label, ConfigPropertyType::Boolean).with_default("false")
    }

    /// Creates a new list (select) property.
    #[must_use]
    pub fn list(name: impl Into<String>, label: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            options,
            ..Self::of_type(name, label, ConfigPropertyType::List)
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Marks the property as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The "Token Claim Name" property every claim mapper exposes.
#[must_use]
pub fn claim_name_property() -> ConfigProperty {
    ConfigProperty::string(keys::CLAIM_NAME, "Token Claim Name")
        .with_help(
            "Name of the claim to insert into the token. Use a dot to nest the claim, \
             e.g. 'dapla.teams'.",
        )
        .required()
}

/// The "Add to ..." properties selecting which tokens receive the claim.
#[must_use]
pub fn include_in_tokens_properties() -> Vec<ConfigProperty> {
    vec![
        ConfigProperty::boolean(keys::ACCESS_TOKEN_CLAIM, "Add to access token")
            .with_help("Should the claim be added to the access token?")
            .with_default("true"),
        ConfigProperty::boolean(keys::ID_TOKEN_CLAIM, "Add to ID token")
            .with_help("Should the claim be added to the ID token?")
            .with_default("true"),
        ConfigProperty::boolean(keys::USERINFO_TOKEN_CLAIM, "Add to userinfo")
            .with_help("Should the claim be added to the userinfo response?")
            .with_default("true"),
    ]
}

/// Context provided to mappers during token transformation.
#[derive(Debug, Clone)]
pub struct MapperContext<'a> {
    /// User information.
    pub user: Option<&'a UserInfo>,

    /// Realm name.
    pub realm: &'a str,

    /// Requested scopes.
    pub scopes: &'a [String],
}

impl<'a> MapperContext<'a> {
    /// Creates a new mapper context.
    #[must_use]
    pub const fn new(realm: &'a str, scopes: &'a [String]) -> Self {
        Self {
            user: None,
            realm,
            scopes,
        }
    }

    /// Sets the user information.
    #[must_use]
    pub const fn with_user(mut self, user: &'a UserInfo) -> Self {
        self.user = Some(user);
        self
    }

    /// Returns the user's email, if a user with an email is present.
    #[must_use]
    pub fn email(&self) -> Option<&'a str> {
        self.user.and_then(|u| u.email.as_deref())
    }
}

/// User information for mappers.
#[derive(Debug, Clone, Default)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,

    /// Username.
    pub username: String,

    /// Email address.
    pub email: Option<String>,
}

impl UserInfo {
    /// Creates user information with a fresh ID.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Core trait for protocol mappers.
///
/// Each mapper type has a unique ID, display information, and configuration
/// properties.
pub trait ProtocolMapper: Send + Sync {
    /// Returns the unique identifier for this mapper type.
    fn id(&self) -> &'static str;

    /// Returns the display name shown in admin UIs.
    fn display_name(&self) -> &'static str;

    /// Returns the category used for grouping in admin UIs.
    fn category(&self) -> &'static str;

    /// Returns a short description of what the mapper does.
    fn help_text(&self) -> &'static str {
        ""
    }

    /// Returns the configuration properties for this mapper.
    fn config_properties(&self) -> Vec<ConfigProperty>;

    /// Returns the priority for this mapper.
    ///
    /// Lower values execute first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Validates the mapper configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn validate_config(&self, _config: &MapperConfig) -> MapperResult<()> {
        Ok(())
    }
}

/// A mapper that computes one claim value.
///
/// The value is written under the instance's configured claim name into
/// every token type the instance is enabled for.
pub trait ClaimMapper: ProtocolMapper {
    /// Computes the claim value.
    ///
    /// Returns `Ok(None)` when there is nothing to contribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be computed.
    fn map_claim(
        &self,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<Option<serde_json::Value>>;
}

/// Trait for mappers that transform access tokens.
pub trait AccessTokenMapper: ProtocolMapper {
    /// Transforms an access token by adding/modifying claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation fails.
    fn transform_access_token(
        &self,
        claims: &mut AccessTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()>;
}

/// Trait for mappers that transform ID tokens.
pub trait IdTokenMapper: ProtocolMapper {
    /// Transforms an ID token by adding/modifying claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation fails.
    fn transform_id_token(
        &self,
        claims: &mut IdTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()>;
}

/// Trait for mappers that transform userinfo responses.
///
/// The userinfo response uses the same structure as access tokens.
pub trait UserInfoMapper: ProtocolMapper {
    /// Transforms a userinfo response by adding/modifying claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation fails.
    fn transform_userinfo(
        &self,
        claims: &mut AccessTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()>;
}

impl<M: ClaimMapper> AccessTokenMapper for M {
    fn transform_access_token(
        &self,
        claims: &mut AccessTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        map_into(self, &mut claims.additional, config, context)
    }
}

impl<M: ClaimMapper> IdTokenMapper for M {
    fn transform_id_token(
        &self,
        claims: &mut IdTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        map_into(self, &mut claims.additional, config, context)
    }
}

impl<M: ClaimMapper> UserInfoMapper for M {
    fn transform_userinfo(
        &self,
        claims: &mut AccessTokenClaims,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        map_into(self, &mut claims.additional, config, context)
    }
}

fn map_into<M: ClaimMapper + ?Sized>(
    mapper: &M,
    claims: &mut ClaimMap,
    config: &MapperConfig,
    context: &MapperContext<'_>,
) -> MapperResult<()> {
    let Some(claim_name) = config.claim_name() else {
        tracing::debug!(
            mapper = mapper.id(),
            instance = %config.name,
            "no claim name configured, skipping"
        );
        return Ok(());
    };

    if !is_valid_claim_path(claim_name) {
        tracing::warn!(
            mapper = mapper.id(),
            instance = %config.name,
            claim = claim_name,
            "claim name has an empty segment, skipping"
        );
        return Ok(());
    }

    if let Some(value) = mapper.map_claim(config, context)? {
        set_claim_nested(claims, claim_name, value);
    }
    Ok(())
}

/// Registry for protocol mappers.
///
/// Manages registration and lookup of mapper implementations and applies
/// configured mapper instances to tokens.
#[derive(Default)]
pub struct ProtocolMapperRegistry {
    /// Registered mappers by ID.
    mappers: HashMap<String, Arc<dyn ProtocolMapper>>,

    /// Access token mappers.
    access_token_mappers: HashMap<String, Arc<dyn AccessTokenMapper>>,

    /// ID token mappers.
    id_token_mappers: HashMap<String, Arc<dyn IdTokenMapper>>,

    /// `UserInfo` mappers.
    userinfo_mappers: HashMap<String, Arc<dyn UserInfoMapper>>,

    /// What to do when a mapper fails.
    failure_policy: ClaimFailurePolicy,
}

impl ProtocolMapperRegistry {
    /// Creates a new empty registry that drops claims on mapper failure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy applied when a mapper returns an error.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: ClaimFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Returns the policy applied when a mapper returns an error.
    #[must_use]
    pub const fn failure_policy(&self) -> ClaimFailurePolicy {
        self.failure_policy
    }

    /// Registers a mapper that implements all token type traits.
    pub fn register_mapper<M>(&mut self, mapper: Arc<M>)
    where
        M: AccessTokenMapper + IdTokenMapper + UserInfoMapper + 'static,
    {
        let id = mapper.id().to_string();
        tracing::debug!(mapper = %id, "registering protocol mapper");

        self.mappers.insert(id.clone(), mapper.clone() as Arc<dyn ProtocolMapper>);
        self.access_token_mappers.insert(id.clone(), mapper.clone() as Arc<dyn AccessTokenMapper>);
        self.id_token_mappers.insert(id.clone(), mapper.clone() as Arc<dyn IdTokenMapper>);
        self.userinfo_mappers.insert(id, mapper as Arc<dyn UserInfoMapper>);
    }

    /// Gets a mapper by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn ProtocolMapper>> {
        self.mappers.get(id)
    }

    /// Returns all registered mapper IDs, sorted.
    #[must_use]
    pub fn mapper_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.mappers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Validates mapper instance configurations against their mapper types.
    ///
    /// Instances of unknown mapper types are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first validation error.
    pub fn validate(&self, mapper_configs: &[MapperConfig]) -> MapperResult<()> {
        for config in mapper_configs {
            if let Some(mapper) = self.get(&config.mapper_type) {
                mapper.validate_config(config)?;
            }
        }
        Ok(())
    }

    /// Applies all configured mappers to access token claims.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapper fails and the failure policy is
    /// [`ClaimFailurePolicy::Abort`].
    pub fn apply_access_token_mappers(
        &self,
        claims: &mut AccessTokenClaims,
        mapper_configs: &[MapperConfig],
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        self.apply(
            "access_token",
            &self.access_token_mappers,
            claims,
            mapper_configs,
            MapperConfig::include_in_access_token,
            |mapper, claims, config| mapper.transform_access_token(claims, config, context),
        )
    }

    /// Applies all configured mappers to ID token claims.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapper fails and the failure policy is
    /// [`ClaimFailurePolicy::Abort`].
    pub fn apply_id_token_mappers(
        &self,
        claims: &mut IdTokenClaims,
        mapper_configs: &[MapperConfig],
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        self.apply(
            "id_token",
            &self.id_token_mappers,
            claims,
            mapper_configs,
            MapperConfig::include_in_id_token,
            |mapper, claims, config| mapper.transform_id_token(claims, config, context),
        )
    }

    /// Applies all configured mappers to a userinfo response.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapper fails and the failure policy is
    /// [`ClaimFailurePolicy::Abort`].
    pub fn apply_userinfo_mappers(
        &self,
        claims: &mut AccessTokenClaims,
        mapper_configs: &[MapperConfig],
        context: &MapperContext<'_>,
    ) -> MapperResult<()> {
        self.apply(
            "userinfo",
            &self.userinfo_mappers,
            claims,
            mapper_configs,
            MapperConfig::include_in_userinfo,
            |mapper, claims, config| mapper.transform_userinfo(claims, config, context),
        )
    }

    fn apply<M, C, F>(
        &self,
        token: &'static str,
        mappers: &HashMap<String, Arc<M>>,
        claims: &mut C,
        mapper_configs: &[MapperConfig],
        include: fn(&MapperConfig) -> bool,
        transform: F,
    ) -> MapperResult<()>
    where
        M: ?Sized,
        F: Fn(&M, &mut C, &MapperConfig) -> MapperResult<()>,
    {
        let mut configs: Vec<_> = mapper_configs.iter().filter(|&c| include(c)).collect();

        // Stable sort: instances with equal priority keep their configured order
        configs.sort_by_key(|c| self.get(&c.mapper_type).map_or(0, |m| m.priority()));

        for config in configs {
            let Some(mapper) = mappers.get(&config.mapper_type) else {
                tracing::warn!(
                    mapper = %config.mapper_type,
                    instance = %config.name,
                    token,
                    "no protocol mapper registered for type, skipping"
                );
                continue;
            };

            if let Err(error) = transform(mapper.as_ref(), claims, config) {
                match self.failure_policy {
                    ClaimFailurePolicy::DropClaim => {
                        tracing::error!(
                            mapper = error.mapper(),
                            instance = %config.name,
                            token,
                            error = %error,
                            "protocol mapper failed, claim dropped"
                        );
                    }
                    ClaimFailurePolicy::Abort => return Err(error),
                }
            }
        }

        Ok(())
    }
}

/// Returns whether `path` can be written: non-empty segments separated
/// by `.`.
fn is_valid_claim_path(path: &str) -> bool {
    path.split('.').all(|segment| !segment.is_empty())
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Sets a claim value, creating intermediate objects for nested paths
/// (`"dapla.teams"`).
///
/// An existing non-object value on the path is left untouched and the new
/// value is discarded.
fn set_claim_nested(claims: &mut ClaimMap, path: &str, value: serde_json::Value) {
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        claims.insert(path.to_string(), value);
        return;
    };

    let mut segments = parents.split('.');
    let Some(head) = segments.next() else {
        return;
    };
    let mut node = claims.entry(head.to_string()).or_insert_with(empty_object);
    for segment in segments {
        let serde_json::Value::Object(obj) = node else {
            return;
        };
        node = obj.entry(segment).or_insert_with(empty_object);
    }

    if let serde_json::Value::Object(obj) = node {
        obj.insert(leaf.to_string(), value);
    }
}
