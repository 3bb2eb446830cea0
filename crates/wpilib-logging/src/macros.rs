//! ---
//! wpi_section: "03-logging"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Structured logging adapters and sinks."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Context-enriched logging macros.

#[doc(hidden)]
#[macro_export]
macro_rules! __wpi_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        $crate::tracing::event!(
            $level,
            workspace = ctx.workspace.unwrap_or(""),
            scope = ctx.scope.unwrap_or(""),
            key = ctx.key.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with workspace context.
#[macro_export]
macro_rules! wpi_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with workspace context.
#[macro_export]
macro_rules! wpi_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with workspace context.
#[macro_export]
macro_rules! wpi_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with workspace context.
#[macro_export]
macro_rules! wpi_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__wpi_event!($crate::tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
