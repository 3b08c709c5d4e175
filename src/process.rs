//! # Módulo de Procesos
//!
//! Este módulo define el registro de proceso que consume el motor de
//! planificación: la identidad y los parámetros estáticos de cada proceso
//! (llegada, ráfaga de CPU, prioridad) junto con los campos de progreso que
//! el motor va mutando durante una corrida.

use std::fmt;

use serde::Serialize;

/// Nivel de prioridad de un proceso.
///
/// El orden es `High > Normal > Low`: en las políticas por prioridad, un
/// proceso `High` siempre se despacha antes que uno `Normal` y este antes
/// que uno `Low`.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::Priority;
///
/// assert!(Priority::High > Priority::Normal);
/// assert!(Priority::Normal > Priority::Low);
/// assert_eq!(Priority::from_token("high"), Some(Priority::High));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    /// Prioridad baja
    Low,
    /// Prioridad normal
    Normal,
    /// Prioridad alta
    High,
}

impl Priority {
    /// Interpreta un token de prioridad proveniente de un archivo de entrada.
    ///
    /// # Arguments
    ///
    /// * `token` - Texto a interpretar; se ignoran mayúsculas/minúsculas y
    ///   espacios en los extremos
    ///
    /// # Returns
    ///
    /// `Some(Priority)` si el token es `HIGH`, `NORMAL` o `LOW`,
    /// `None` en caso contrario
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "NORMAL" => Some(Self::Normal),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
            Self::Low => "LOW",
        };
        write!(f, "{}", token)
    }
}

/// Registro de un proceso dentro de una corrida de simulación.
///
/// Combina los parámetros estáticos (identidad, llegada, ráfaga, prioridad)
/// con los campos de progreso que el motor actualiza (`remaining_time`,
/// `start_time`, `completion_time`). Los campos de progreso pertenecen en
/// exclusiva a la corrida que opera sobre el proceso: cada corrida debe
/// recibir su propia copia del conjunto de procesos (el motor toma
/// `Vec<Process>` por valor justamente para eso).
///
/// Invariantes que el motor mantiene:
/// - `0 <= remaining_time <= burst_time`
/// - `start_time` se fija una sola vez, en el primer despacho
/// - `completion_time` se fija una sola vez, cuando `remaining_time` llega a 0
#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    /// Identificador único dentro de la corrida
    pub id: String,
    /// Instante de llegada (>= 0)
    pub arrival_time: f64,
    /// Ráfaga total de CPU requerida (> 0)
    pub burst_time: f64,
    /// Nivel de prioridad
    pub priority: Priority,
    /// Tiempo de CPU pendiente
    pub remaining_time: f64,
    /// Instante del primer despacho, si ya ocurrió
    pub start_time: Option<f64>,
    /// Instante de finalización, si ya ocurrió
    pub completion_time: Option<f64>,
}

impl Process {
    /// Crea un proceso a partir de sus parámetros estáticos.
    ///
    /// El tiempo restante se inicializa igual a la ráfaga completa.
    ///
    /// # Arguments
    ///
    /// * `id` - Identificador único del proceso
    /// * `arrival_time` - Instante de llegada
    /// * `burst_time` - Ráfaga total de CPU
    /// * `priority` - Nivel de prioridad
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::{Priority, Process};
    ///
    /// let p = Process::new("P1", 0.0, 5.0, Priority::Normal);
    /// assert_eq!(p.remaining_time, 5.0);
    /// assert!(p.start_time.is_none());
    /// ```
    pub fn new(id: impl Into<String>, arrival_time: f64, burst_time: f64, priority: Priority) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
            priority,
            remaining_time: burst_time,
            start_time: None,
            completion_time: None,
        }
    }

    /// Restablece los campos de progreso al estado inicial.
    ///
    /// El motor lo invoca al comenzar cada corrida, aunque reciba copias
    /// frescas, para garantizar que no se arrastra progreso de una corrida
    /// anterior.
    pub fn reset(&mut self) {
        self.remaining_time = self.burst_time;
        self.start_time = None;
        self.completion_time = None;
    }

    /// Indica si el proceso ya terminó su ráfaga completa.
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    /// Tiempo de turnaround: desde la llegada hasta la finalización.
    ///
    /// # Returns
    ///
    /// `Some(turnaround)` si el proceso terminó, `None` en caso contrario
    pub fn turnaround_time(&self) -> Option<f64> {
        self.completion_time.map(|c| c - self.arrival_time)
    }

    /// Tiempo de espera: turnaround menos la ráfaga de CPU.
    ///
    /// # Returns
    ///
    /// `Some(espera)` si el proceso terminó, `None` en caso contrario
    pub fn waiting_time(&self) -> Option<f64> {
        self.turnaround_time().map(|t| t - self.burst_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);

        let mut levels = vec![Priority::Normal, Priority::High, Priority::Low];
        levels.sort();
        assert_eq!(levels, vec![Priority::Low, Priority::Normal, Priority::High]);
    }

    #[test]
    fn test_priority_from_token() {
        assert_eq!(Priority::from_token("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_token("  normal "), Some(Priority::Normal));
        assert_eq!(Priority::from_token("Low"), Some(Priority::Low));
        assert_eq!(Priority::from_token("urgent"), None);
        assert_eq!(Priority::from_token(""), None);
    }

    #[test]
    fn test_new_process_initial_state() {
        let p = Process::new("P1", 3.0, 7.5, Priority::High);
        assert_eq!(p.id, "P1");
        assert_eq!(p.remaining_time, p.burst_time);
        assert!(p.start_time.is_none());
        assert!(p.completion_time.is_none());
        assert!(!p.is_completed());
        assert!(p.turnaround_time().is_none());
        assert!(p.waiting_time().is_none());
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut p = Process::new("P1", 0.0, 4.0, Priority::Normal);
        p.remaining_time = 1.0;
        p.start_time = Some(0.0);
        p.completion_time = Some(4.0);

        p.reset();

        assert_eq!(p.remaining_time, 4.0);
        assert!(p.start_time.is_none());
        assert!(p.completion_time.is_none());
    }

    #[test]
    fn test_turnaround_and_waiting() {
        let mut p = Process::new("P2", 1.0, 3.0, Priority::Normal);
        p.completion_time = Some(8.0);

        assert_eq!(p.turnaround_time(), Some(7.0));
        assert_eq!(p.waiting_time(), Some(4.0));
    }
}
