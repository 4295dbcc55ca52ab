//! Constantes del motor core.
//!
//! `ENGINE_VERSION` forma parte del input del hash de definición: un cambio
//! de versión del motor produce un `definition_hash` distinto aunque la lista
//! de fases sea la misma.

/// Versión lógica del motor. Mantener estable mientras no haya cambios
/// incompatibles en la semántica de resolución o de registro.
pub const ENGINE_VERSION: &str = "P1.0";

/// Prefijo de cada línea de sub-error dentro de un error agregado.
pub const DETAIL_LINE_PREFIX: &str = "\n    - ";

/// Variable de entorno que activa el volcado detallado de fallos.
pub const ENV_DEBUG: &str = "PHASEFLOW_DEBUG";

/// Variable de entorno con los flags de limpieza aplicados en `close`.
pub const ENV_CLEAR_ON_CLOSE: &str = "PHASEFLOW_CLEAR_ON_CLOSE";
