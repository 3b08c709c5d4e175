//! # Módulo de Ingesta de Escenarios
//!
//! Este módulo lee y valida los archivos CSV que describen un escenario de
//! procesos. Toda fila malformada se rechaza aquí, antes de invocar al motor:
//! el motor solo recibe conjuntos de procesos ya validados, ordenados por
//! tiempo de llegada con los empates en orden de entrada.
//!
//! Formato esperado (el orden de las columnas es libre):
//!
//! ```text
//! Process_ID,Arrival_Time,CPU_Burst_Time,Priority
//! P1,0,5,NORMAL
//! P2,1,3,HIGH
//! ```

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::process::{Priority, Process};

/// Columnas obligatorias del encabezado.
const REQUIRED_COLUMNS: [&str; 4] = ["Process_ID", "Arrival_Time", "CPU_Burst_Time", "Priority"];

/// Errores de validación de un archivo de escenario.
#[derive(Debug)]
pub enum ParseError {
    /// No se pudo leer el archivo
    Io {
        /// Ruta del archivo
        path: String,
        /// Error subyacente
        source: io::Error,
    },
    /// El archivo no tiene encabezado
    EmptyFile,
    /// Falta una columna obligatoria en el encabezado
    MissingColumn {
        /// Nombre de la columna ausente
        column: &'static str,
    },
    /// Una fila no tiene la misma cantidad de campos que el encabezado
    WrongFieldCount {
        /// Número de fila (1-indexado, sin contar el encabezado)
        row: usize,
        /// Campos esperados
        expected: usize,
        /// Campos encontrados
        found: usize,
    },
    /// Identificador de proceso vacío
    EmptyProcessId {
        /// Número de fila
        row: usize,
    },
    /// Identificador de proceso repetido dentro del escenario
    DuplicateProcessId {
        /// Número de fila
        row: usize,
        /// Identificador repetido
        id: String,
    },
    /// Un campo numérico no pudo interpretarse
    InvalidNumber {
        /// Número de fila
        row: usize,
        /// Columna del campo
        column: &'static str,
        /// Valor recibido
        value: String,
    },
    /// Tiempo de llegada negativo
    NegativeArrival {
        /// Número de fila
        row: usize,
        /// Valor recibido
        value: f64,
    },
    /// Ráfaga de CPU no positiva
    NonPositiveBurst {
        /// Número de fila
        row: usize,
        /// Valor recibido
        value: f64,
    },
    /// Token de prioridad fuera de {HIGH, NORMAL, LOW}
    InvalidPriority {
        /// Número de fila
        row: usize,
        /// Token recibido
        value: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "no se pudo leer '{}': {}", path, source),
            Self::EmptyFile => write!(f, "el archivo de escenario está vacío"),
            Self::MissingColumn { column } => {
                write!(f, "falta la columna obligatoria '{}'", column)
            }
            Self::WrongFieldCount { row, expected, found } => write!(
                f,
                "fila {}: se esperaban {} campos y se encontraron {}",
                row, expected, found
            ),
            Self::EmptyProcessId { row } => write!(f, "fila {}: Process_ID vacío", row),
            Self::DuplicateProcessId { row, id } => {
                write!(f, "fila {}: Process_ID repetido '{}'", row, id)
            }
            Self::InvalidNumber { row, column, value } => {
                write!(f, "fila {}: valor numérico inválido en {}: '{}'", row, column, value)
            }
            Self::NegativeArrival { row, value } => {
                write!(f, "fila {}: tiempo de llegada negativo ({})", row, value)
            }
            Self::NonPositiveBurst { row, value } => {
                write!(f, "fila {}: la ráfaga de CPU debe ser positiva ({})", row, value)
            }
            Self::InvalidPriority { row, value } => {
                write!(f, "fila {}: prioridad inválida '{}' (se espera HIGH, NORMAL o LOW)", row, value)
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Lee y valida un archivo de escenario.
///
/// # Arguments
///
/// * `path` - Ruta del archivo CSV
///
/// # Returns
///
/// Los procesos validados, ordenados por llegada, o el primer
/// [`ParseError`] encontrado
pub fn parse_csv_file(path: &Path) -> Result<Vec<Process>, ParseError> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(&content)
}

/// Valida el contenido CSV de un escenario.
///
/// Las filas en blanco se ignoran. La salida queda ordenada de forma
/// estable por tiempo de llegada: los empates conservan el orden del
/// archivo.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::parser::parse_csv;
///
/// let contenido = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
///                  P2,3,2,HIGH\n\
///                  P1,0,5,low\n";
/// let procesos = parse_csv(contenido).unwrap();
/// assert_eq!(procesos[0].id, "P1");
/// assert_eq!(procesos[1].id, "P2");
/// ```
pub fn parse_csv(content: &str) -> Result<Vec<Process>, ParseError> {
    let mut lines = content.lines();
    let header = lines.next().ok_or(ParseError::EmptyFile)?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let mut column_index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, required) in column_index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = columns
            .iter()
            .position(|&c| c == required)
            .ok_or(ParseError::MissingColumn { column: required })?;
    }
    let [id_col, arrival_col, burst_col, priority_col] = column_index;

    let mut processes = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut row = 0;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        row += 1;

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            return Err(ParseError::WrongFieldCount {
                row,
                expected: columns.len(),
                found: fields.len(),
            });
        }

        let id = fields[id_col];
        if id.is_empty() {
            return Err(ParseError::EmptyProcessId { row });
        }
        if !seen_ids.insert(id.to_string()) {
            return Err(ParseError::DuplicateProcessId { row, id: id.to_string() });
        }

        let arrival_time = parse_number(fields[arrival_col], row, "Arrival_Time")?;
        if arrival_time < 0.0 {
            return Err(ParseError::NegativeArrival { row, value: arrival_time });
        }

        let burst_time = parse_number(fields[burst_col], row, "CPU_Burst_Time")?;
        if burst_time <= 0.0 {
            return Err(ParseError::NonPositiveBurst { row, value: burst_time });
        }

        let priority = Priority::from_token(fields[priority_col]).ok_or_else(|| {
            ParseError::InvalidPriority {
                row,
                value: fields[priority_col].to_string(),
            }
        })?;

        processes.push(Process::new(id, arrival_time, burst_time, priority));
    }

    processes.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
    Ok(processes)
}

fn parse_number(value: &str, row: usize, column: &'static str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
                         P1,0,5,NORMAL\n\
                         P2,1,3,HIGH\n\
                         P3,2,1,LOW\n";

    #[test]
    fn test_parse_valid_scenario() {
        let processes = parse_csv(VALID).unwrap();
        assert_eq!(processes.len(), 3);
        assert_eq!(processes[0].id, "P1");
        assert_eq!(processes[1].priority, Priority::High);
        assert_eq!(processes[2].burst_time, 1.0);
    }

    #[test]
    fn test_output_sorted_by_arrival_stable() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
                       PB,5,1,LOW\n\
                       PA,0,1,LOW\n\
                       PC,5,1,LOW\n";
        let processes = parse_csv(content).unwrap();
        let ids: Vec<&str> = processes.iter().map(|p| p.id.as_str()).collect();
        // Empate en t=5: PB conserva su lugar delante de PC
        assert_eq!(ids, vec!["PA", "PB", "PC"]);
    }

    #[test]
    fn test_columns_in_any_order() {
        let content = "Priority,CPU_Burst_Time,Process_ID,Arrival_Time\n\
                       high,2,P9,4\n";
        let processes = parse_csv(content).unwrap();
        assert_eq!(processes[0].id, "P9");
        assert_eq!(processes[0].arrival_time, 4.0);
        assert_eq!(processes[0].priority, Priority::High);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
                       \n\
                       P1,0,5,NORMAL\n\
                       \n";
        assert_eq!(parse_csv(content).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column_rejected() {
        let content = "Process_ID,Arrival_Time,Priority\nP1,0,NORMAL\n";
        assert!(matches!(
            parse_csv(content),
            Err(ParseError::MissingColumn { column: "CPU_Burst_Time" })
        ));
    }

    #[test]
    fn test_invalid_priority_rejected() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\nP1,0,5,URGENTE\n";
        assert!(matches!(
            parse_csv(content),
            Err(ParseError::InvalidPriority { row: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\nP1,pronto,5,LOW\n";
        assert!(matches!(
            parse_csv(content),
            Err(ParseError::InvalidNumber { row: 1, column: "Arrival_Time", .. })
        ));
    }

    #[test]
    fn test_negative_arrival_and_zero_burst_rejected() {
        let negative = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\nP1,-1,5,LOW\n";
        assert!(matches!(
            parse_csv(negative),
            Err(ParseError::NegativeArrival { row: 1, .. })
        ));

        let zero_burst = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\nP1,0,0,LOW\n";
        assert!(matches!(
            parse_csv(zero_burst),
            Err(ParseError::NonPositiveBurst { row: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
                       P1,0,5,LOW\n\
                       P1,1,2,HIGH\n";
        assert!(matches!(
            parse_csv(content),
            Err(ParseError::DuplicateProcessId { row: 2, .. })
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(parse_csv(""), Err(ParseError::EmptyFile)));
    }

    #[test]
    fn test_header_only_is_empty_scenario() {
        let content = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n";
        assert!(parse_csv(content).unwrap().is_empty());
    }
}
