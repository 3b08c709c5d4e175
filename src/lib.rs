//! # Simulador de Planificación de CPU
//!
//! Esta biblioteca implementa un simulador determinista y fuera de línea de
//! algoritmos de planificación de CPU. Corre seis políticas sobre conjuntos
//! de procesos leídos de archivos CSV y produce líneas de tiempo, métricas
//! comparativas y reportes por escenario.
//!
//! ## Características principales
//!
//! - **Seis algoritmos de planificación**: FCFS, SJF (preemptivo y no
//!   preemptivo), Round Robin con quantum configurable y planificación por
//!   prioridad (preemptiva y no preemptiva).
//! - **Tiempo simulado**: el reloj es una variable `f64`; el simulador nunca
//!   duerme ni consulta el reloj de pared, por lo que toda corrida es
//!   reproducible.
//! - **Costo de cambio de contexto**: cada transición entre procesos
//!   distintos puede cobrar un costo configurable que desplaza el reloj.
//! - **Métricas detalladas**: tiempos de espera y turnaround, eficiencia de
//!   CPU, cambios de contexto y throughput en puntos de control.
//! - **Escenarios en paralelo**: varios archivos de escenario pueden
//!   procesarse con un hilo por archivo (`std::thread` + `std::sync::mpsc`).
//!
//! ## Estructura del proyecto
//!
//! - `process`: los procesos y sus prioridades
//! - `timeline`: los intervalos de ejecución y de CPU ociosa
//! - `scheduler`: el motor con los seis algoritmos de planificación
//! - `metrics`: el cálculo de métricas de una corrida
//! - `parser`: la ingesta y validación de los archivos CSV
//! - `report`: la generación de los archivos de resultados
//! - `simulation`: el orquestador que coordina escenarios completos

pub mod metrics;
pub mod parser;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod simulation;
pub mod timeline;

// Re-exportar las estructuras principales para facilitar su uso
pub use metrics::{Metrics, MetricsCalculator, ThroughputPoint};
pub use parser::{parse_csv, parse_csv_file, ParseError};
pub use process::{Priority, Process};
pub use report::ResultGenerator;
pub use scheduler::{Scheduler, SchedulerError, SchedulingPolicy, SchedulingResult};
pub use simulation::{PolicyOutcome, Simulation};
pub use timeline::{SlotOwner, TimeSlot, Timeline};

/// Configuración por defecto del simulador
pub mod config {
    /// Quantum por defecto para Round Robin (unidades de tiempo simulado)
    pub const DEFAULT_QUANTUM: f64 = 2.0;

    /// Costo por defecto de un cambio de contexto
    pub const DEFAULT_CONTEXT_SWITCH_TIME: f64 = 0.001;

    /// Directorio de salida por defecto para los reportes
    pub const DEFAULT_RESULTS_DIR: &str = "resultados";

    /// Puntos de control de throughput por defecto
    pub fn default_checkpoints() -> Vec<f64> {
        vec![50.0, 100.0, 150.0, 200.0]
    }
}
