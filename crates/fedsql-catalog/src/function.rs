//! Function identifiers and catalog entries
//!
//! Identifiers are assigned by hand and never derived from table position:
//! planners persist them and compare them across processes, so an id, once
//! published, keeps its meaning for the lifetime of a catalog version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable function identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad semantic class of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionClass {
    /// One output per input row
    Scalar,
    /// One output per group of rows
    Aggregate,
    /// Date/time functions that may be written without parentheses
    Niladic,
    /// Niladic functions answered from the client session (`CURRENT_USER`)
    Session,
    /// Spatial extension scalar function
    Spatial,
    /// Spatial extension aggregate
    SpatialAggregate,
}

impl FunctionClass {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, FunctionClass::Aggregate | FunctionClass::SpatialAggregate)
    }
}

/// Accepted positional argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    /// `None` means variadic
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Arity { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Arity { min, max: Some(max) }
    }

    pub const fn variadic(min: usize) -> Self {
        Arity { min, max: None }
    }

    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.min && self.max.map_or(true, |max| argc <= max)
    }

    /// Human-readable descriptor, e.g. `1`, `2..3`, `1+`
    pub fn describe(&self) -> String {
        match self.max {
            Some(max) if max == self.min => self.min.to_string(),
            Some(max) => format!("{}..{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// One entry of the function catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionCatalogEntry {
    pub id: FunctionId,
    /// The spelling emitted when no source spelling is available
    pub canonical_name: &'static str,
    pub class: FunctionClass,
    pub arity: Arity,
}

impl FunctionCatalogEntry {
    pub fn is_aggregate(&self) -> bool {
        self.class.is_aggregate()
    }
}

const fn exact(n: usize) -> Arity {
    Arity::exact(n)
}

const fn range(min: usize, max: usize) -> Arity {
    Arity::range(min, max)
}

const fn variadic(min: usize) -> Arity {
    Arity::variadic(min)
}

/// Declares the `ids` constants and the entry table from one list so the two
/// cannot drift apart.
macro_rules! function_catalog {
    ($($(#[$meta:meta])* $name:ident = $id:literal, $canonical:literal, $class:ident, $arity:expr;)*) => {
        /// Function identifier constants
        pub mod ids {
            use super::FunctionId;
            $($(#[$meta])* pub const $name: FunctionId = FunctionId($id);)*
        }

        pub(crate) static ENTRIES: &[FunctionCatalogEntry] = &[
            $(FunctionCatalogEntry {
                id: ids::$name,
                canonical_name: $canonical,
                class: FunctionClass::$class,
                arity: $arity,
            },)*
        ];
    };
}

function_catalog! {
    // Aggregates
    AVG = 1, "AVG", Aggregate, exact(1);
    COUNT = 2, "COUNT", Aggregate, exact(1);
    COUNT_STAR = 3, "COUNT", Aggregate, exact(0);
    MAX = 4, "MAX", Aggregate, exact(1);
    MIN = 5, "MIN", Aggregate, exact(1);
    SUM = 6, "SUM", Aggregate, exact(1);
    BIT_AND = 7, "BIT_AND", Aggregate, exact(1);
    BIT_OR = 8, "BIT_OR", Aggregate, exact(1);
    BOOL_AND = 9, "BOOL_AND", Aggregate, exact(1);
    BOOL_OR = 10, "BOOL_OR", Aggregate, exact(1);
    EVERY = 11, "EVERY", Aggregate, exact(1);
    STDDEV = 12, "STDDEV", Aggregate, exact(1);
    STDDEV_POP = 13, "STDDEV_POP", Aggregate, exact(1);
    STDDEV_SAMP = 14, "STDDEV_SAMP", Aggregate, exact(1);
    VARIANCE = 15, "VARIANCE", Aggregate, exact(1);
    VARIANCE_POP = 16, "VAR_POP", Aggregate, exact(1);
    VARIANCE_SAMP = 17, "VAR_SAMP", Aggregate, exact(1);
    CORR = 18, "CORR", Aggregate, exact(2);
    COVAR_POP = 19, "COVAR_POP", Aggregate, exact(2);
    COVAR_SAMP = 20, "COVAR_SAMP", Aggregate, exact(2);
    REGR_AVGX = 21, "REGR_AVGX", Aggregate, exact(2);
    REGR_AVGY = 22, "REGR_AVGY", Aggregate, exact(2);
    REGR_COUNT = 23, "REGR_COUNT", Aggregate, exact(2);
    REGR_INTERCEPT = 24, "REGR_INTERCEPT", Aggregate, exact(2);
    REGR_R2 = 25, "REGR_R2", Aggregate, exact(2);
    REGR_SLOPE = 26, "REGR_SLOPE", Aggregate, exact(2);
    REGR_SXX = 27, "REGR_SXX", Aggregate, exact(2);
    REGR_SXY = 28, "REGR_SXY", Aggregate, exact(2);
    REGR_SYY = 29, "REGR_SYY", Aggregate, exact(2);
    ARRAY_AGG = 30, "ARRAY_AGG", Aggregate, exact(1);
    STRING_AGG = 31, "STRING_AGG", Aggregate, exact(2);

    // Mathematical
    ABS = 50, "ABS", Scalar, exact(1);
    ACOS = 51, "ACOS", Scalar, exact(1);
    ASIN = 52, "ASIN", Scalar, exact(1);
    ATAN = 53, "ATAN", Scalar, exact(1);
    ATAN2 = 54, "ATAN2", Scalar, exact(2);
    CBRT = 55, "CBRT", Scalar, exact(1);
    CEIL = 56, "CEIL", Scalar, range(1, 2);
    COS = 57, "COS", Scalar, exact(1);
    COT = 58, "COT", Scalar, exact(1);
    DEGREES = 59, "DEGREES", Scalar, exact(1);
    EXP = 60, "EXP", Scalar, exact(1);
    FLOOR = 61, "FLOOR", Scalar, range(1, 2);
    LN = 62, "LN", Scalar, exact(1);
    LOG = 63, "LOG", Scalar, range(1, 2);
    MOD = 64, "MOD", Scalar, exact(2);
    PI = 65, "PI", Scalar, exact(0);
    POWER = 66, "POWER", Scalar, exact(2);
    RADIANS = 67, "RADIANS", Scalar, exact(1);
    RANDOM = 68, "RANDOM", Scalar, exact(0);
    ROUND = 69, "ROUND", Scalar, range(1, 2);
    SIGN = 70, "SIGN", Scalar, exact(1);
    SIN = 71, "SIN", Scalar, exact(1);
    SQRT = 72, "SQRT", Scalar, exact(1);
    TAN = 73, "TAN", Scalar, exact(1);
    TRUNC = 74, "TRUNC", Scalar, range(1, 2);
    WIDTH_BUCKET = 75, "WIDTH_BUCKET", Scalar, exact(4);
    SETSEED = 76, "SETSEED", Scalar, exact(1);
    FACTORIAL = 77, "FACTORIAL", Scalar, exact(1);
    GREATEST = 78, "GREATEST", Scalar, variadic(1);
    LEAST = 79, "LEAST", Scalar, variadic(1);
    LOG10 = 80, "LOG10", Scalar, exact(1);
    DIV = 81, "DIV", Scalar, exact(2);
    GCD = 82, "GCD", Scalar, exact(2);
    LCM = 83, "LCM", Scalar, exact(2);

    // Character strings
    ASCII = 100, "ASCII", Scalar, exact(1);
    /// Catalog version 1 assigned `BIT_LENGTH` the id of `AGE` (181). Trees
    /// persisted under version 1 that carry 181 for a `BIT_LENGTH` call map to
    /// this id.
    BIT_LENGTH = 101, "BIT_LENGTH", Scalar, exact(1);
    BTRIM = 102, "BTRIM", Scalar, range(1, 2);
    CHAR_LENGTH = 103, "CHAR_LENGTH", Scalar, exact(1);
    CHR = 104, "CHR", Scalar, exact(1);
    CONCAT = 105, "CONCAT", Scalar, variadic(1);
    CONVERT = 106, "CONVERT", Scalar, range(2, 3);
    CONVERT_FROM = 107, "CONVERT_FROM", Scalar, exact(2);
    CONVERT_TO = 108, "CONVERT_TO", Scalar, exact(2);
    DECODE = 109, "DECODE", Scalar, exact(2);
    ENCODE = 110, "ENCODE", Scalar, exact(2);
    INITCAP = 111, "INITCAP", Scalar, exact(1);
    INDEX = 112, "INDEX", Scalar, exact(2);
    INSTR = 113, "INSTR", Scalar, exact(2);
    LEFT = 114, "LEFT", Scalar, exact(2);
    LENGTH = 115, "LENGTH", Scalar, range(1, 2);
    LOWER = 116, "LOWER", Scalar, exact(1);
    LPAD = 117, "LPAD", Scalar, range(2, 3);
    LTRIM = 118, "LTRIM", Scalar, range(1, 2);
    MD5 = 119, "MD5", Scalar, exact(1);
    OCTET_LENGTH = 120, "OCTET_LENGTH", Scalar, exact(1);
    OVERLAY = 121, "OVERLAY", Scalar, range(3, 4);
    POSITION = 122, "POSITION", Scalar, exact(2);
    QUOTE_IDENT = 123, "QUOTE_IDENT", Scalar, exact(1);
    QUOTE_LITERAL = 124, "QUOTE_LITERAL", Scalar, exact(1);
    REPEAT = 125, "REPEAT", Scalar, exact(2);
    REPLACE = 126, "REPLACE", Scalar, exact(3);
    REVERSE = 127, "REVERSE", Scalar, exact(1);
    RIGHT = 128, "RIGHT", Scalar, exact(2);
    RPAD = 129, "RPAD", Scalar, range(2, 3);
    RTRIM = 130, "RTRIM", Scalar, range(1, 2);
    SPLIT_PART = 131, "SPLIT_PART", Scalar, exact(3);
    STRPOS = 132, "STRPOS", Scalar, exact(2);
    SUBSTR = 133, "SUBSTR", Scalar, range(2, 3);
    SUBSTRING = 134, "SUBSTRING", Scalar, range(1, 3);
    TO_ASCII = 135, "TO_ASCII", Scalar, range(1, 2);
    TO_HEX = 136, "TO_HEX", Scalar, exact(1);
    TRANSLATE = 137, "TRANSLATE", Scalar, exact(3);
    TRIM = 138, "TRIM", Scalar, range(1, 2);
    UPPER = 139, "UPPER", Scalar, exact(1);
    LFILL = 140, "LFILL", Scalar, range(2, 3);
    RFILL = 141, "RFILL", Scalar, range(2, 3);
    SOUNDEX = 142, "SOUNDEX", Scalar, exact(1);
    SPACE = 143, "SPACE", Scalar, exact(1);
    REGEXP_REPLACE = 144, "REGEXP_REPLACE", Scalar, range(3, 4);
    REGEXP_MATCHES = 145, "REGEXP_MATCHES", Scalar, range(2, 3);
    CONCAT_WS = 146, "CONCAT_WS", Scalar, variadic(2);
    TO_CHAR = 147, "TO_CHAR", Scalar, exact(2);
    TO_NUMBER = 148, "TO_NUMBER", Scalar, exact(2);

    // Date and time
    ADD_MONTHS = 180, "ADD_MONTHS", Scalar, exact(2);
    AGE = 181, "AGE", Scalar, range(1, 2);
    CLOCK_TIMESTAMP = 182, "CLOCK_TIMESTAMP", Scalar, exact(0);
    CURRENT_DATE = 183, "CURRENT_DATE", Niladic, exact(0);
    CURRENT_TIME = 184, "CURRENT_TIME", Niladic, range(0, 1);
    CURRENT_TIMESTAMP = 185, "CURRENT_TIMESTAMP", Niladic, range(0, 1);
    DATE = 186, "DATE", Scalar, exact(1);
    DATE_PART = 187, "DATE_PART", Scalar, exact(2);
    DATE_TRUNC = 188, "DATE_TRUNC", Scalar, exact(2);
    DAY = 189, "DAY", Scalar, exact(1);
    DAYNAME = 190, "DAYNAME", Scalar, exact(1);
    DAYOFMONTH = 191, "DAYOFMONTH", Scalar, exact(1);
    DAYOFWEEK = 192, "DAYOFWEEK", Scalar, exact(1);
    DAYOFYEAR = 193, "DAYOFYEAR", Scalar, exact(1);
    DAYS = 194, "DAYS", Scalar, exact(1);
    EXTRACT = 195, "EXTRACT", Scalar, exact(2);
    HOUR = 196, "HOUR", Scalar, exact(1);
    ISFINITE = 197, "ISFINITE", Scalar, exact(1);
    JUSTIFY_DAYS = 198, "JUSTIFY_DAYS", Scalar, exact(1);
    JUSTIFY_HOURS = 199, "JUSTIFY_HOURS", Scalar, exact(1);
    LAST_DAY = 200, "LAST_DAY", Scalar, exact(1);
    LOCALTIME = 201, "LOCALTIME", Niladic, range(0, 1);
    LOCALTIMESTAMP = 202, "LOCALTIMESTAMP", Niladic, range(0, 1);
    MINUTE = 203, "MINUTE", Scalar, exact(1);
    MONTH = 204, "MONTH", Scalar, exact(1);
    MONTHNAME = 205, "MONTHNAME", Scalar, exact(1);
    MONTHS_BETWEEN = 206, "MONTHS_BETWEEN", Scalar, exact(2);
    NEXT_DAY = 207, "NEXT_DAY", Scalar, exact(2);
    NOW = 208, "NOW", Scalar, exact(0);
    SECOND = 209, "SECOND", Scalar, exact(1);
    TIME = 210, "TIME", Scalar, exact(1);
    TIMEOFDAY = 211, "TIMEOFDAY", Scalar, exact(0);
    TIMESTAMP = 212, "TIMESTAMP", Scalar, range(1, 2);
    TO_DATE = 213, "TO_DATE", Scalar, exact(2);
    TO_TIMESTAMP = 214, "TO_TIMESTAMP", Scalar, range(1, 2);
    WEEK = 215, "WEEK", Scalar, exact(1);
    WEEKOFYEAR = 216, "WEEKOFYEAR", Scalar, exact(1);
    YEAR = 217, "YEAR", Scalar, exact(1);
    ADDDATE = 218, "ADDDATE", Scalar, exact(2);
    ADDTIME = 219, "ADDTIME", Scalar, exact(2);
    DATEDIFF = 220, "DATEDIFF", Scalar, exact(2);
    SUBDATE = 221, "SUBDATE", Scalar, exact(2);
    SUBTIME = 222, "SUBTIME", Scalar, exact(2);
    MAKEDATE = 223, "MAKEDATE", Scalar, exact(2);
    MAKETIME = 224, "MAKETIME", Scalar, exact(3);
    FROM_DAYS = 225, "FROM_DAYS", Scalar, exact(1);
    STATEMENT_TIMESTAMP = 226, "STATEMENT_TIMESTAMP", Scalar, exact(0);
    TRANSACTION_TIMESTAMP = 227, "TRANSACTION_TIMESTAMP", Scalar, exact(0);
    QUARTER = 228, "QUARTER", Scalar, exact(1);
    MICROSECOND = 229, "MICROSECOND", Scalar, exact(1);

    // Conditional and session
    COALESCE = 260, "COALESCE", Scalar, variadic(1);
    NULLIF = 261, "NULLIF", Scalar, exact(2);
    NVL = 262, "NVL", Scalar, exact(2);
    NVL2 = 263, "NVL2", Scalar, exact(3);
    CURRENT_USER = 264, "CURRENT_USER", Session, exact(0);
    SESSION_USER = 265, "SESSION_USER", Session, exact(0);
    USER = 266, "USER", Session, exact(0);
    CURRENT_DATABASE = 267, "CURRENT_DATABASE", Session, exact(0);
    DATABASE = 268, "DATABASE", Session, exact(0);
    CURRENT_SCHEMA = 269, "CURRENT_SCHEMA", Session, exact(0);
    VERSION = 270, "VERSION", Scalar, exact(0);

    // Network addresses
    ABBREV = 290, "ABBREV", Scalar, exact(1);
    BROADCAST = 291, "BROADCAST", Scalar, exact(1);
    FAMILY = 292, "FAMILY", Scalar, exact(1);
    HOST = 293, "HOST", Scalar, exact(1);
    HOSTMASK = 294, "HOSTMASK", Scalar, exact(1);
    MASKLEN = 295, "MASKLEN", Scalar, exact(1);
    NETMASK = 296, "NETMASK", Scalar, exact(1);
    NETWORK = 297, "NETWORK", Scalar, exact(1);
    SET_MASKLEN = 298, "SET_MASKLEN", Scalar, exact(2);
    TEXT = 299, "TEXT", Scalar, exact(1);

    // Geometric
    AREA = 310, "AREA", Scalar, exact(1);
    BOX = 311, "BOX", Scalar, range(1, 2);
    CENTER = 312, "CENTER", Scalar, exact(1);
    CIRCLE = 313, "CIRCLE", Scalar, range(1, 2);
    DIAMETER = 314, "DIAMETER", Scalar, exact(1);
    HEIGHT = 315, "HEIGHT", Scalar, exact(1);
    ISCLOSED = 316, "ISCLOSED", Scalar, exact(1);
    ISOPEN = 317, "ISOPEN", Scalar, exact(1);
    LSEG = 318, "LSEG", Scalar, range(1, 2);
    NPOINTS = 319, "NPOINTS", Scalar, exact(1);
    PATH = 320, "PATH", Scalar, exact(1);
    PCLOSE = 321, "PCLOSE", Scalar, exact(1);
    POINT = 322, "POINT", Scalar, range(1, 2);
    POLYGON = 323, "POLYGON", Scalar, range(1, 2);
    POPEN = 324, "POPEN", Scalar, exact(1);
    RADIUS = 325, "RADIUS", Scalar, exact(1);
    WIDTH = 326, "WIDTH", Scalar, exact(1);

    // Binary strings
    GET_BIT = 340, "GET_BIT", Scalar, exact(2);
    GET_BYTE = 341, "GET_BYTE", Scalar, exact(2);
    SET_BIT = 342, "SET_BIT", Scalar, exact(3);
    SET_BYTE = 343, "SET_BYTE", Scalar, exact(3);

    // Spatial
    ST_AREA = 400, "ST_AREA", Spatial, exact(1);
    ST_ASBINARY = 401, "ST_ASBINARY", Spatial, range(1, 2);
    ST_ASEWKB = 402, "ST_ASEWKB", Spatial, exact(1);
    ST_ASEWKT = 403, "ST_ASEWKT", Spatial, exact(1);
    ST_ASGEOJSON = 404, "ST_ASGEOJSON", Spatial, range(1, 3);
    ST_ASKML = 405, "ST_ASKML", Spatial, range(1, 2);
    ST_ASSVG = 406, "ST_ASSVG", Spatial, range(1, 3);
    ST_ASTEXT = 407, "ST_ASTEXT", Spatial, exact(1);
    ST_AZIMUTH = 408, "ST_AZIMUTH", Spatial, exact(2);
    ST_BOUNDARY = 409, "ST_BOUNDARY", Spatial, exact(1);
    ST_BUFFER = 410, "ST_BUFFER", Spatial, range(2, 3);
    ST_CENTROID = 411, "ST_CENTROID", Spatial, exact(1);
    ST_CLOSESTPOINT = 412, "ST_CLOSESTPOINT", Spatial, exact(2);
    ST_COLLECT = 413, "ST_COLLECT", Spatial, exact(2);
    ST_CONTAINS = 414, "ST_CONTAINS", Spatial, exact(2);
    ST_CONVEXHULL = 415, "ST_CONVEXHULL", Spatial, exact(1);
    ST_COVEREDBY = 416, "ST_COVEREDBY", Spatial, exact(2);
    ST_COVERS = 417, "ST_COVERS", Spatial, exact(2);
    ST_CROSSES = 418, "ST_CROSSES", Spatial, exact(2);
    ST_DIFFERENCE = 419, "ST_DIFFERENCE", Spatial, exact(2);
    ST_DIMENSION = 420, "ST_DIMENSION", Spatial, exact(1);
    ST_DISJOINT = 421, "ST_DISJOINT", Spatial, exact(2);
    ST_DISTANCE = 422, "ST_DISTANCE", Spatial, exact(2);
    ST_DISTANCE_SPHERE = 423, "ST_DISTANCE_SPHERE", Spatial, exact(2);
    ST_DWITHIN = 424, "ST_DWITHIN", Spatial, exact(3);
    ST_ENDPOINT = 425, "ST_ENDPOINT", Spatial, exact(1);
    ST_ENVELOPE = 426, "ST_ENVELOPE", Spatial, exact(1);
    ST_EQUALS = 427, "ST_EQUALS", Spatial, exact(2);
    ST_EXTERIORRING = 428, "ST_EXTERIORRING", Spatial, exact(1);
    ST_FORCE_2D = 429, "ST_FORCE_2D", Spatial, exact(1);
    ST_FORCE_3D = 430, "ST_FORCE_3D", Spatial, exact(1);
    ST_GEOMETRYN = 431, "ST_GEOMETRYN", Spatial, exact(2);
    ST_GEOMETRYTYPE = 432, "ST_GEOMETRYTYPE", Spatial, exact(1);
    ST_GEOMFROMTEXT = 433, "ST_GEOMFROMTEXT", Spatial, range(1, 2);
    ST_GEOMFROMWKB = 434, "ST_GEOMFROMWKB", Spatial, range(1, 2);
    ST_HAUSDORFFDISTANCE = 435, "ST_HAUSDORFFDISTANCE", Spatial, exact(2);
    ST_INTERIORRINGN = 436, "ST_INTERIORRINGN", Spatial, exact(2);
    ST_INTERSECTION = 437, "ST_INTERSECTION", Spatial, exact(2);
    ST_INTERSECTS = 438, "ST_INTERSECTS", Spatial, exact(2);
    ST_ISCLOSED = 439, "ST_ISCLOSED", Spatial, exact(1);
    ST_ISEMPTY = 440, "ST_ISEMPTY", Spatial, exact(1);
    ST_ISRING = 441, "ST_ISRING", Spatial, exact(1);
    ST_ISSIMPLE = 442, "ST_ISSIMPLE", Spatial, exact(1);
    ST_ISVALID = 443, "ST_ISVALID", Spatial, exact(1);
    ST_LENGTH = 444, "ST_LENGTH", Spatial, exact(1);
    ST_LENGTH2D = 445, "ST_LENGTH2D", Spatial, exact(1);
    ST_LENGTH3D = 446, "ST_LENGTH3D", Spatial, exact(1);
    ST_LINEFROMTEXT = 447, "ST_LINEFROMTEXT", Spatial, range(1, 2);
    ST_LINEMERGE = 448, "ST_LINEMERGE", Spatial, exact(1);
    ST_LINE_INTERPOLATE_POINT = 449, "ST_LINE_INTERPOLATE_POINT", Spatial, exact(2);
    ST_LINE_LOCATE_POINT = 450, "ST_LINE_LOCATE_POINT", Spatial, exact(2);
    ST_LINE_SUBSTRING = 451, "ST_LINE_SUBSTRING", Spatial, exact(3);
    ST_LONGESTLINE = 452, "ST_LONGESTLINE", Spatial, exact(2);
    ST_MAKELINE = 453, "ST_MAKELINE", Spatial, exact(2);
    ST_MAKEPOINT = 454, "ST_MAKEPOINT", Spatial, range(2, 4);
    ST_MAKEPOLYGON = 455, "ST_MAKEPOLYGON", Spatial, range(1, 2);
    ST_MAXDISTANCE = 456, "ST_MAXDISTANCE", Spatial, exact(2);
    ST_MULTI = 457, "ST_MULTI", Spatial, exact(1);
    ST_NPOINTS = 458, "ST_NPOINTS", Spatial, exact(1);
    ST_NUMGEOMETRIES = 459, "ST_NUMGEOMETRIES", Spatial, exact(1);
    ST_NUMINTERIORRINGS = 460, "ST_NUMINTERIORRINGS", Spatial, exact(1);
    ST_NUMPOINTS = 461, "ST_NUMPOINTS", Spatial, exact(1);
    ST_OVERLAPS = 462, "ST_OVERLAPS", Spatial, exact(2);
    ST_PERIMETER = 463, "ST_PERIMETER", Spatial, exact(1);
    ST_POINTN = 464, "ST_POINTN", Spatial, exact(2);
    ST_POINTONSURFACE = 465, "ST_POINTONSURFACE", Spatial, exact(1);
    ST_POLYGONFROMTEXT = 466, "ST_POLYGONFROMTEXT", Spatial, range(1, 2);
    ST_RELATE = 467, "ST_RELATE", Spatial, range(2, 3);
    ST_REVERSE = 468, "ST_REVERSE", Spatial, exact(1);
    ST_ROTATE = 469, "ST_ROTATE", Spatial, exact(2);
    ST_SCALE = 470, "ST_SCALE", Spatial, range(3, 4);
    ST_SEGMENTIZE = 471, "ST_SEGMENTIZE", Spatial, exact(2);
    ST_SETSRID = 472, "ST_SETSRID", Spatial, exact(2);
    ST_SHORTESTLINE = 473, "ST_SHORTESTLINE", Spatial, exact(2);
    ST_SIMPLIFY = 474, "ST_SIMPLIFY", Spatial, exact(2);
    ST_SNAPTOGRID = 475, "ST_SNAPTOGRID", Spatial, range(2, 5);
    ST_SRID = 476, "ST_SRID", Spatial, exact(1);
    ST_STARTPOINT = 477, "ST_STARTPOINT", Spatial, exact(1);
    ST_SYMDIFFERENCE = 478, "ST_SYMDIFFERENCE", Spatial, exact(2);
    ST_TOUCHES = 479, "ST_TOUCHES", Spatial, exact(2);
    ST_TRANSFORM = 480, "ST_TRANSFORM", Spatial, exact(2);
    ST_TRANSLATE = 481, "ST_TRANSLATE", Spatial, range(3, 4);
    ST_UNION = 482, "ST_UNION", Spatial, exact(2);
    ST_WITHIN = 483, "ST_WITHIN", Spatial, exact(2);
    ST_X = 484, "ST_X", Spatial, exact(1);
    ST_Y = 485, "ST_Y", Spatial, exact(1);
    ST_Z = 486, "ST_Z", Spatial, exact(1);
    ST_M = 487, "ST_M", Spatial, exact(1);
    ST_XMIN = 488, "ST_XMIN", Spatial, exact(1);
    ST_XMAX = 489, "ST_XMAX", Spatial, exact(1);
    ST_YMIN = 490, "ST_YMIN", Spatial, exact(1);
    ST_YMAX = 491, "ST_YMAX", Spatial, exact(1);
    ST_ZMIN = 492, "ST_ZMIN", Spatial, exact(1);
    ST_ZMAX = 493, "ST_ZMAX", Spatial, exact(1);
    ST_ADDPOINT = 494, "ST_ADDPOINT", Spatial, range(2, 3);
    ST_REMOVEPOINT = 495, "ST_REMOVEPOINT", Spatial, exact(2);
    ST_SETPOINT = 496, "ST_SETPOINT", Spatial, exact(3);
    ST_AFFINE = 497, "ST_AFFINE", Spatial, range(7, 13);
    ST_BOX2D = 498, "ST_BOX2D", Spatial, exact(1);
    ST_BOX3D = 499, "ST_BOX3D", Spatial, exact(1);
    ST_POINT = 500, "ST_POINT", Spatial, exact(2);
    ST_ISVALIDREASON = 501, "ST_ISVALIDREASON", Spatial, exact(1);

    // Spatial aggregates
    ST_COLLECT_AGG = 520, "ST_COLLECT", SpatialAggregate, exact(1);
    ST_EXTENT = 521, "ST_EXTENT", SpatialAggregate, exact(1);
    ST_EXTENT3D = 522, "ST_EXTENT3D", SpatialAggregate, exact(1);
    ST_MAKELINE_AGG = 523, "ST_MAKELINE", SpatialAggregate, exact(1);
    ST_UNION_AGG = 524, "ST_UNION", SpatialAggregate, exact(1);
    ST_ACCUM = 525, "ST_ACCUM", SpatialAggregate, exact(1);
    ST_POLYGONIZE = 526, "ST_POLYGONIZE", SpatialAggregate, exact(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for entry in ENTRIES {
            assert!(seen.insert(entry.id), "duplicate id {} ({})", entry.id, entry.canonical_name);
        }
        assert!(ENTRIES.len() >= 300);
    }

    #[test]
    fn test_published_ids_are_pinned() {
        assert_eq!(ids::COUNT, FunctionId(2));
        assert_eq!(ids::COUNT_STAR, FunctionId(3));
        assert_eq!(ids::CEIL, FunctionId(56));
        assert_eq!(ids::AGE, FunctionId(181));
        assert_eq!(ids::BIT_LENGTH, FunctionId(101));
        assert_eq!(ids::ST_COLLECT_AGG, FunctionId(520));
    }

    #[test]
    fn test_arity() {
        assert!(exact(2).accepts(2));
        assert!(!exact(2).accepts(1));
        assert!(range(1, 2).accepts(1) && range(1, 2).accepts(2));
        assert!(!range(1, 2).accepts(3));
        assert!(variadic(1).accepts(40));
        assert!(!variadic(1).accepts(0));
        assert_eq!(variadic(2).describe(), "2+");
        assert_eq!(range(2, 3).describe(), "2..3");
        assert_eq!(exact(0).describe(), "0");
    }

    #[test]
    fn test_aggregate_classes() {
        let count = ENTRIES.iter().find(|e| e.id == ids::COUNT).unwrap();
        assert!(count.is_aggregate());
        let extent = ENTRIES.iter().find(|e| e.id == ids::ST_EXTENT).unwrap();
        assert!(extent.is_aggregate());
        let abs = ENTRIES.iter().find(|e| e.id == ids::ABS).unwrap();
        assert!(!abs.is_aggregate());
    }
}
