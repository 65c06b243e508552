//! Serialize and deserialize `Int` as a decimal string.

use core::fmt;

use serde_core::de::Visitor;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::int::Int;

impl Serialize for Int {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D>(deserializer: D) -> Result<Int, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IntVisitor;

        impl<'de> Visitor<'de> for IntVisitor {
            type Value = Int;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string or an integer")
            }

            fn visit_str<E>(self, value: &str) -> Result<Int, E>
            where
                E: serde_core::de::Error,
            {
                Int::from_str_radix(value, 10).map_err(E::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Int, E>
            where
                E: serde_core::de::Error,
            {
                Ok(Int::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Int, E>
            where
                E: serde_core::de::Error,
            {
                Ok(Int::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Int, E>
            where
                E: serde_core::de::Error,
            {
                Ok(Int::from(value))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Int, E>
            where
                E: serde_core::de::Error,
            {
                Ok(Int::from(value))
            }
        }

        deserializer.deserialize_str(IntVisitor)
    }
}
