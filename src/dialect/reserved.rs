//! Keywords recognised by the Databend lexer.
//!
//! Stored lower-cased. An identifier whose lower-cased form appears here is
//! always quoted by the [`IdentifierPreparer`](super::preparer::IdentifierPreparer).

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Raw keyword list, sorted and lower-cased.
pub const KEYWORDS: &[&str] = &[
    "abort", "abs", "account", "add", "address", "after", "aggregating", "all",
    "allowed_ip_list", "alter", "always", "analyze", "and", "anti", "any", "append_only",
    "args", "array", "arrowat", "as", "asc", "ast", "async", "at", "atarrow", "atat",
    "atquestion", "attach", "authorization_header", "auto", "auto_ingest", "backslash",
    "before", "begin", "between", "bigint", "binary", "binary_format", "bitmap", "bitwiseand",
    "bitwisenot", "bitwiseor", "bitwisexor", "blob", "blocked_ip_list", "bool", "boolean",
    "both", "break", "brotli", "by", "bz2", "call", "caret", "case", "cast", "catalog",
    "catalogs", "century", "changes", "char", "character", "cluster", "coalesce", "colon",
    "colonequal", "column", "columnposition", "columns", "comma", "comment", "commentblock",
    "comments", "commit", "compact", "compression", "conflict", "connection", "connections",
    "consume", "content_type", "continue", "copy", "copy_options", "count", "create",
    "credential", "cron", "cross", "csv", "cube", "cuberoot", "current", "current_timestamp",
    "data", "database", "databases", "date", "date_add", "date_part", "date_sub", "date_trunc",
    "datetime", "day", "days", "decade", "decimal", "declare", "default", "default_role",
    "deflate", "delete", "delta", "desc", "describe", "detailed_output", "disable",
    "disable_variant_check", "disabled", "distinct", "div", "divide", "do", "dot", "double",
    "double_sha1_password", "doublecolon", "doubleeq", "doubleexclamationmark", "dow",
    "download", "downstream", "doy", "drop", "dry", "dynamic", "else", "elseif",
    "empty_field_as", "enable", "enable_virtual_host_style", "enabled", "end", "endpoint",
    "engine", "engines", "eoi", "epoch", "eq", "error", "error_integration",
    "error_on_column_count_mismatch", "escape", "except", "exception_backtrace",
    "exclamationmarktilde", "exclamationmarktildeasterisk", "exclude", "execute", "exists",
    "expire", "explain", "extract", "factorial", "false", "fatrarrow", "field_delimiter",
    "fields", "file", "file_format", "files", "final", "first", "flashback", "float", "float32",
    "float64", "following", "for", "force", "format", "format_name", "formats", "fragments",
    "from", "full", "function", "functions", "fuse", "generated", "geometry", "get", "global",
    "grant", "grants", "graph", "group", "grouping", "gt", "gte", "gzip", "handler",
    "hashlongrarrow", "hashminus", "hashrarrow", "having", "high", "hintprefix", "hintsuffix",
    "history", "hive", "hour", "hours", "iceberg", "ident", "identified", "identifier", "if",
    "ifnull", "ignore", "ignore_result", "immediate", "in", "incremental", "index", "indexes",
    "information", "initialize", "inner", "insert", "int", "int16", "int32", "int64", "int8",
    "intdiv", "integer", "integration", "intersect", "interval", "into", "inverted", "is",
    "isodow", "isoyear", "join", "json", "julian", "jwt", "key", "kill", "l2distance",
    "language", "last", "lateral", "lbrace", "lbracket", "leading", "left", "let", "like",
    "limit", "list", "literalatstring", "literalcodestring", "literalfloat", "literalinteger",
    "literalstring", "location_prefix", "locks", "logical", "longblob", "longrarrow",
    "longtext", "loop", "low", "lparen", "lt", "lte", "lzo", "map", "masking", "master_key",
    "matched", "materialized", "max_file_size", "max_files", "medium", "mediumblob",
    "mediumtext", "memo", "memory", "merge", "method", "metrics", "microseconds", "millennium",
    "millisecond", "milliseconds", "minus", "minute", "missing_field_as", "modified_after",
    "modify", "modulo", "month", "multiply", "must_change_password", "mysqlliteralhex",
    "nan_display", "natural", "ndjson", "network", "no_password", "non_display", "none", "not",
    "notenantsetting", "noteq", "notification", "null", "null_display", "null_field_as",
    "null_if", "nullable", "nullif", "nulls", "object", "of", "offset", "on", "on_create",
    "on_error", "on_schedule", "optimize", "optimized", "options", "or", "orc", "order",
    "outer", "output_header", "over", "overwrite", "ownership", "parquet", "partition",
    "password", "password_history", "password_lockout_time_mins", "password_max_age_days",
    "password_max_length", "password_max_retries", "password_min_age_days",
    "password_min_length", "password_min_lower_case_chars", "password_min_numeric_chars",
    "password_min_special_chars", "password_min_upper_case_chars", "pattern", "pgliteralhex",
    "pipe", "pipe_execution_paused", "pipeline", "pivot", "placeholder", "plaintext_password",
    "plus", "policies", "policy", "position", "preceding", "precision", "prefix", "presign",
    "priority", "privileges", "processlist", "purge", "put", "qualify", "quarter", "query",
    "questionand", "questionor", "quote", "random", "range", "rarrow", "raw", "rawdeflate",
    "rbrace", "rbracket", "read", "read_only", "recluster", "record_delimiter", "recursive",
    "reference_usage", "refresh", "refresh_mode", "regexp", "remove", "rename", "repeat",
    "replace", "respect", "resultset", "resume", "retain", "return", "return_failed_only",
    "returns", "reverse", "revoke", "right", "rlike", "role", "roles", "rollback", "rollup",
    "row", "row_tag", "rows", "rparen", "run", "schedule", "schema", "schemas", "second",
    "secondary", "seconds", "segment", "select", "semi", "semicolon", "sequence", "session",
    "set", "set_var", "sets", "settings", "sha256_password", "share", "shares", "shiftleft",
    "shiftright", "show", "signed", "since", "single", "size_limit", "skip_header", "smallint",
    "snappy", "snapshot", "some", "sounds", "spaceship", "split_size", "squareroot", "stage",
    "stages", "statistic", "status", "storage_type", "stored", "stream", "streams", "string",
    "stringconcat", "substr", "substring", "summary", "super", "suspend",
    "suspend_task_after_num_failures", "sync", "syntax", "system", "table", "table_functions",
    "tables", "target_lag", "task", "tasks", "temporary", "tenant", "tenants", "tenantsetting",
    "text", "then", "tildeasterisk", "timestamp", "timezone", "timezone_hour",
    "timezone_minute", "tinyblob", "tinyint", "tinytext", "to", "token", "top", "trailing",
    "transaction", "transient", "trim", "true", "truncate", "try_cast", "tsv", "tuple", "type",
    "udf", "uint16", "uint32", "uint64", "uint8", "unbounded", "undrop", "union", "unmatched",
    "unpivot", "unset", "unsigned", "until", "update", "upload", "url", "usage", "use", "user",
    "users", "using", "vacuum", "validation_mode", "values", "varbinary", "varchar", "variant",
    "verbose", "view", "views", "virtual", "warehouse", "webhook", "week", "when", "where",
    "while", "whitespace", "window", "with", "write", "xml", "xor", "xz", "year", "zstd",
];

/// Membership set built once on first use.
pub static RESERVED_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KEYWORDS.iter().copied().collect());

/// Whether `word` collides with a Databend keyword (case-insensitive).
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_lowercase().as_str())
}
