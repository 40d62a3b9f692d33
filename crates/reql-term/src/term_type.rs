//! Operation tags.
//!
//! A [`TermType`] is the numeric identifier the query engine uses to tell one
//! operation kind from another. It is a plain newtype rather than an enum so
//! that the set of tags stays open: hosts may register tags the builtin
//! catalog does not know about (see [`crate::catalog::HashMapTermCatalog`]).
//! The associated constants cover the tags this crate ships metadata for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire identifier of an operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermType(pub u32);

macro_rules! term_type_consts {
    ($($name:ident = $value:expr),* $(,)?) => {
        impl TermType {
            $(pub const $name: TermType = TermType($value);)*
        }
    };
}

term_type_consts! {
    DATUM = 1,
    MAKE_ARRAY = 2,
    MAKE_OBJ = 3,
    VAR = 10,
    JAVASCRIPT = 11,
    ERROR = 12,
    IMPLICIT_VAR = 13,
    DB = 14,
    TABLE = 15,
    GET = 16,
    EQ = 17,
    NE = 18,
    LT = 19,
    LE = 20,
    GT = 21,
    GE = 22,
    NOT = 23,
    ADD = 24,
    SUB = 25,
    MUL = 26,
    DIV = 27,
    MOD = 28,
    APPEND = 29,
    SLICE = 30,
    GET_FIELD = 31,
    HAS_FIELDS = 32,
    PLUCK = 33,
    WITHOUT = 34,
    MERGE = 35,
    REDUCE = 37,
    MAP = 38,
    FILTER = 39,
    CONCAT_MAP = 40,
    ORDER_BY = 41,
    DISTINCT = 42,
    COUNT = 43,
    UNION = 44,
    NTH = 45,
    INNER_JOIN = 48,
    OUTER_JOIN = 49,
    EQ_JOIN = 50,
    COERCE_TO = 51,
    TYPE_OF = 52,
    UPDATE = 53,
    DELETE = 54,
    REPLACE = 55,
    INSERT = 56,
    DB_CREATE = 57,
    DB_DROP = 58,
    DB_LIST = 59,
    TABLE_CREATE = 60,
    TABLE_DROP = 61,
    TABLE_LIST = 62,
    FUNCALL = 64,
    BRANCH = 65,
    OR = 66,
    AND = 67,
    FOR_EACH = 68,
    FUNC = 69,
    SKIP = 70,
    LIMIT = 71,
    ZIP = 72,
    ASC = 73,
    DESC = 74,
    INDEX_CREATE = 75,
    INDEX_DROP = 76,
    INDEX_LIST = 77,
    GET_ALL = 78,
    INFO = 79,
    PREPEND = 80,
    SAMPLE = 81,
    INSERT_AT = 82,
    DELETE_AT = 83,
    CHANGE_AT = 84,
    SPLICE_AT = 85,
    IS_EMPTY = 86,
    OFFSETS_OF = 87,
    SET_INSERT = 88,
    SET_INTERSECTION = 89,
    SET_UNION = 90,
    SET_DIFFERENCE = 91,
    DEFAULT = 92,
    CONTAINS = 93,
    KEYS = 94,
    DIFFERENCE = 95,
    WITH_FIELDS = 96,
    MATCH = 97,
    JSON = 98,
    ISO8601 = 99,
    TO_ISO8601 = 100,
    EPOCH_TIME = 101,
    TO_EPOCH_TIME = 102,
    NOW = 103,
    IN_TIMEZONE = 104,
    DURING = 105,
    DATE = 106,
    TIME = 136,
    LITERAL = 137,
    SYNC = 138,
    INDEX_STATUS = 139,
    INDEX_WAIT = 140,
    UPCASE = 141,
    DOWNCASE = 142,
    OBJECT = 143,
    GROUP = 144,
    SUM = 145,
    AVG = 146,
    MIN = 147,
    MAX = 148,
    SPLIT = 149,
    UNGROUP = 150,
    RANDOM = 151,
    CHANGES = 152,
    HTTP = 153,
    ARGS = 154,
    BINARY = 155,
    INDEX_RENAME = 156,
    UUID = 169,
    BRACKET = 170,
    TO_JSON_STRING = 172,
    RANGE = 173,
    CONFIG = 174,
    STATUS = 175,
    WAIT = 177,
    MINVAL = 180,
    MAXVAL = 181,
    BETWEEN = 182,
    FLOOR = 183,
    CEIL = 184,
    ROUND = 185,
    VALUES = 186,
    FOLD = 187,
}

impl TermType {
    /// The numeric value written to the wire.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TermType {
    fn from(value: u32) -> Self {
        TermType(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_numbers() {
        assert_eq!(TermType::DATUM.value(), 1);
        assert_eq!(TermType::MAKE_ARRAY.value(), 2);
        assert_eq!(TermType::FUNC.value(), 69);
        assert_eq!(TermType::ZIP.value(), 72);
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&TermType::ZIP).unwrap();
        assert_eq!(json, "72");
        let back: TermType = serde_json::from_str("72").unwrap();
        assert_eq!(back, TermType::ZIP);
    }
}
