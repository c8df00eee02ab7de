use crate::{
    EnvConfig,
    error::{ConfigError, LoadErrors},
    field::FieldDescriptor,
    handler::{ErrorHandler, GlobalHandler},
    parse::{parse_bool, parse_int},
    source::{ProcessEnv, Source},
};

/// When a field marked `required` produces an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredPolicy {
    /// Error whenever the field has no default, even if the variable is set
    #[default]
    DefaultPresent,
    /// Error only when the variable is unset or empty and there is no default
    Resolved,
}

/// Resolves, coerces and writes configuration fields.
///
/// # Example
/// ```rust
/// use envconf::{EnvConfig, Loader};
///
/// #[derive(Default, EnvConfig)]
/// struct Config {
///     #[field(env = "DOC_APP_PORT", default = "8080")]
///     port: i32,
/// }
///
/// let mut config = Config::default();
/// let mut loader = Loader::with_source([("DOC_APP_PORT", "9090")]);
/// loader.load(&mut config).unwrap();
/// assert_eq!(config.port, 9090);
/// ```
pub struct Loader<'a> {
    source: Box<dyn Source + 'a>,
    handler: Option<Box<dyn ErrorHandler + 'a>>,
    policy: RequiredPolicy,
    errors: Vec<ConfigError>,
}

impl Loader<'static> {
    /// Loader over the live process environment, collecting errors without a handler
    pub fn new() -> Self {
        Self::with_source(ProcessEnv)
    }
}

impl<'a> Loader<'a> {
    pub fn with_source(source: impl Source + 'a) -> Self {
        Self {
            source: Box::new(source),
            handler: None,
            policy: RequiredPolicy::default(),
            errors: Vec::new(),
        }
    }

    /// Install a handler that sees every error as it is reported
    pub fn with_handler(mut self, handler: impl ErrorHandler + 'a) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn required_policy(mut self, policy: RequiredPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Errors reported by the most recent load
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Populate `config` in field declaration order.
    ///
    /// Not atomic: fields before a failing one keep their new values, and
    /// loading continues past errors. Returns every error of this pass.
    pub fn load<C: EnvConfig + ?Sized>(&mut self, config: &mut C) -> Result<(), LoadErrors> {
        let _span = tracing::debug_span!("load_config", fields = C::fields().len()).entered();

        self.errors.clear();
        config.apply(self);

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(LoadErrors::from(self.errors.clone()))
        }
    }

    /// Resolve a string field. `None` means leave the field untouched.
    pub fn string(&mut self, field: &FieldDescriptor) -> Option<String> {
        self.resolve(field)
    }

    /// Resolve an integer field. The caller narrows or widens to the field's width.
    pub fn int(&mut self, field: &FieldDescriptor) -> Option<i64> {
        let raw = self.resolve(field)?;
        match parse_int(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                self.report(ConfigError::IntegerParse {
                    field: field.name.to_string(),
                    env: field.env.to_string(),
                    value: raw,
                    source,
                });
                None
            }
        }
    }

    pub fn bool(&mut self, field: &FieldDescriptor) -> Option<bool> {
        let raw = self.resolve(field)?;
        match parse_bool(&raw) {
            Some(value) => Some(value),
            None => {
                self.report(ConfigError::BooleanParse {
                    field: field.name.to_string(),
                    env: field.env.to_string(),
                    value: raw,
                });
                None
            }
        }
    }

    /// Fields of unsupported types are never written, but still go through
    /// resolution so the required check applies to them.
    pub fn unsupported(&mut self, field: &FieldDescriptor) {
        if self.resolve(field).is_some() {
            tracing::debug!(field = field.name, "not writing field of unsupported type");
        }
    }

    fn resolve(&mut self, field: &FieldDescriptor) -> Option<String> {
        if field.is_skipped() {
            tracing::debug!(field = field.name, "skipping field without env or default");
            return None;
        }

        let from_env = if field.env.is_empty() {
            None
        } else {
            self.source.get(field.env).filter(|value| !value.is_empty())
        };

        if field.required && !field.has_default() {
            let missing = match self.policy {
                RequiredPolicy::DefaultPresent => true,
                RequiredPolicy::Resolved => from_env.is_none(),
            };
            if missing {
                self.report(ConfigError::MissingRequiredDefault {
                    field: field.name.to_string(),
                    env: field.env.to_string(),
                });
            }
        }

        match from_env {
            Some(value) => {
                tracing::debug!(field = field.name, env = field.env, "resolved from environment");
                Some(value)
            }
            None => {
                tracing::debug!(field = field.name, env = field.env, "resolved from default");
                Some(field.default.to_string())
            }
        }
    }

    fn report(&mut self, error: ConfigError) {
        if let Some(handler) = self.handler.as_mut() {
            handler.handle(&error);
        }
        self.errors.push(error);
    }
}

impl Default for Loader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

/// Populate `config` from the process environment, routing errors through the
/// process-wide handler.
///
/// With the built-in handler installed the process exits on the first error,
/// so this only returns `Err` when a non-terminating handler was set with
/// [`set_error_handler`](crate::set_error_handler).
pub fn load_config<C: EnvConfig + ?Sized>(config: &mut C) -> Result<(), LoadErrors> {
    Loader::new().with_handler(GlobalHandler).load(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    const PORT: FieldDescriptor = FieldDescriptor::new("port", FieldKind::Int, "APP_PORT", "8080", false);
    const NAME: FieldDescriptor = FieldDescriptor::new("name", FieldKind::String, "APP_NAME", "svc", false);
    const DEBUG: FieldDescriptor = FieldDescriptor::new("debug", FieldKind::Bool, "APP_DEBUG", "true", false);
    const TOKEN: FieldDescriptor = FieldDescriptor::new("token", FieldKind::String, "APP_TOKEN", "", true);
    const BARE: FieldDescriptor = FieldDescriptor::new("bare", FieldKind::String, "", "", false);

    #[test]
    fn test_string_falls_back_to_default() {
        let mut loader = Loader::with_source([("OTHER", "x")]);
        assert_eq!(loader.string(&NAME).as_deref(), Some("svc"));
    }

    #[test]
    fn test_string_prefers_environment() {
        let mut loader = Loader::with_source([("APP_NAME", "api")]);
        assert_eq!(loader.string(&NAME).as_deref(), Some("api"));
    }

    #[test]
    fn test_empty_environment_value_uses_default() {
        let mut loader = Loader::with_source([("APP_NAME", "")]);
        assert_eq!(loader.string(&NAME).as_deref(), Some("svc"));
    }

    #[test]
    fn test_skipped_field_resolves_to_none() {
        let mut loader = Loader::with_source([("", "nope")]);
        assert_eq!(loader.string(&BARE), None);
        assert!(loader.errors().is_empty());
    }

    #[test]
    fn test_default_only_field_is_not_looked_up() {
        const ONLY_DEFAULT: FieldDescriptor =
            FieldDescriptor::new("region", FieldKind::String, "", "eu", false);

        let mut loader = Loader::with_source([("", "us")]);
        assert_eq!(loader.string(&ONLY_DEFAULT).as_deref(), Some("eu"));
    }

    #[test]
    fn test_int_parses_environment() {
        let mut loader = Loader::with_source([("APP_PORT", "9090")]);
        assert_eq!(loader.int(&PORT), Some(9090));
    }

    #[test]
    fn test_int_parse_error_reported() {
        let mut loader = Loader::with_source([("APP_PORT", "notanumber")]);

        assert_eq!(loader.int(&PORT), None);
        assert_eq!(loader.errors().len(), 1);
        match &loader.errors()[0] {
            ConfigError::IntegerParse { field, env, value, .. } => {
                assert_eq!(field, "port");
                assert_eq!(env, "APP_PORT");
                assert_eq!(value, "notanumber");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bool_parses_default_and_override() {
        let mut loader = Loader::with_source([("UNRELATED", "1")]);
        assert_eq!(loader.bool(&DEBUG), Some(true));

        let mut loader = Loader::with_source([("APP_DEBUG", "F")]);
        assert_eq!(loader.bool(&DEBUG), Some(false));
    }

    #[test]
    fn test_bool_parse_error_reported() {
        let mut loader = Loader::with_source([("APP_DEBUG", "yes")]);

        assert_eq!(loader.bool(&DEBUG), None);
        assert!(matches!(
            loader.errors(),
            [ConfigError::BooleanParse { value, .. }] if value == "yes"
        ));
    }

    #[test]
    fn test_required_without_default_errors_even_when_set() {
        let mut loader = Loader::with_source([("APP_TOKEN", "secret")]);

        assert_eq!(loader.string(&TOKEN).as_deref(), Some("secret"));
        assert!(matches!(
            loader.errors(),
            [ConfigError::MissingRequiredDefault { field, env }] if field == "token" && env == "APP_TOKEN"
        ));
    }

    #[test]
    fn test_resolved_policy_accepts_set_variable() {
        let mut loader =
            Loader::with_source([("APP_TOKEN", "secret")]).required_policy(RequiredPolicy::Resolved);

        assert_eq!(loader.string(&TOKEN).as_deref(), Some("secret"));
        assert!(loader.errors().is_empty());
    }

    #[test]
    fn test_resolved_policy_rejects_unset_variable() {
        let mut loader =
            Loader::with_source([("OTHER", "x")]).required_policy(RequiredPolicy::Resolved);

        assert_eq!(loader.string(&TOKEN).as_deref(), Some(""));
        assert_eq!(loader.errors().len(), 1);
    }

    #[test]
    fn test_required_with_default_never_errors() {
        const REQUIRED_PORT: FieldDescriptor =
            FieldDescriptor::new("port", FieldKind::Int, "APP_PORT", "8080", true);

        let mut loader = Loader::with_source([("OTHER", "x")]);
        assert_eq!(loader.int(&REQUIRED_PORT), Some(8080));
        assert!(loader.errors().is_empty());
    }

    #[test]
    fn test_handler_sees_errors_as_reported() {
        let mut seen = Vec::new();
        {
            let mut loader = Loader::with_source([("APP_PORT", "x"), ("APP_DEBUG", "y")])
                .with_handler(|error: &ConfigError| seen.push(error.field().to_string()));

            loader.int(&PORT);
            loader.bool(&DEBUG);
            assert_eq!(loader.errors().len(), 2);
        }

        assert_eq!(seen, vec!["port", "debug"]);
    }

    #[test]
    fn test_unsupported_required_without_default_is_reported() {
        const RATIO: FieldDescriptor =
            FieldDescriptor::new("ratio", FieldKind::Unsupported, "APP_RATIO", "", true);

        let mut loader = Loader::with_source([("APP_RATIO", "0.5")]);
        loader.unsupported(&RATIO);

        assert!(matches!(
            loader.errors(),
            [ConfigError::MissingRequiredDefault { field, .. }] if field == "ratio"
        ));
    }

    #[test]
    fn test_unsupported_with_default_is_silent() {
        const RATIO: FieldDescriptor =
            FieldDescriptor::new("ratio", FieldKind::Unsupported, "APP_RATIO", "0.5", true);

        let mut loader = Loader::with_source([("APP_RATIO", "nope")]);
        loader.unsupported(&RATIO);

        assert!(loader.errors().is_empty());
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(RequiredPolicy::default(), RequiredPolicy::DefaultPresent);
    }
}
