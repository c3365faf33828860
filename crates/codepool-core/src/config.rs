/// Loading of service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// variable names (`database_url` reads `DATABASE_URL`). Use `#[serde(default)]`
/// for optional settings.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Read the process environment.
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Read an explicit set of variables instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
