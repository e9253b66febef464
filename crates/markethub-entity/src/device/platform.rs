//! Device platform tag.

/// Platform a device token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DevicePlatform {
    /// Android via FCM.
    Android,
    /// iOS via FCM/APNs bridging.
    Ios,
    /// Browser push.
    Web,
    /// Unrecognized platform tag, carried verbatim.
    Other(String),
}

impl DevicePlatform {
    /// Return the platform as its storage string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for DevicePlatform {
    fn from(value: &str) -> Self {
        match value {
            "android" => Self::Android,
            "ios" => Self::Ios,
            "web" => Self::Web,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for DevicePlatform {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl std::fmt::Display for DevicePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for DevicePlatform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for DevicePlatform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

impl sqlx::Type<sqlx::Postgres> for DevicePlatform {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for DevicePlatform {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        buf.extend_from_slice(self.as_str().as_bytes());
        Ok(sqlx::encode::IsNull::No)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DevicePlatform {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_platforms_round_trip() {
        for raw in ["android", "ios", "web"] {
            let platform = DevicePlatform::from(raw);
            assert!(!matches!(platform, DevicePlatform::Other(_)));
            assert_eq!(platform.as_str(), raw);
        }
    }

    #[test]
    fn unknown_platform_is_preserved() {
        let platform = DevicePlatform::from("wearable");
        assert_eq!(platform.as_str(), "wearable");
    }
}
