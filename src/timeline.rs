//! # Módulo de Línea de Tiempo
//!
//! Este módulo define los intervalos (`TimeSlot`) que produce una corrida de
//! planificación y la secuencia ordenada que los agrupa (`Timeline`). La
//! línea de tiempo es de solo-agregado: el motor emite intervalos en orden
//! temporal y nunca los reordena ni los borra.

use serde::Serialize;

/// Dueño de un intervalo de la línea de tiempo.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SlotOwner {
    /// El intervalo corresponde a la ejecución de un proceso concreto
    Process(String),
    /// El intervalo es tiempo ocioso de CPU (sin procesos listos)
    Idle,
}

/// Un intervalo de la línea de tiempo: ejecución de un proceso o CPU ociosa.
///
/// Invariante: `end_time > start_time` (los intervalos de duración cero
/// están prohibidos). Dentro de una misma línea de tiempo los intervalos no
/// se solapan y aparecen en orden temporal no decreciente.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeSlot {
    /// Proceso dueño del intervalo, o CPU ociosa
    pub owner: SlotOwner,
    /// Inicio del intervalo
    pub start_time: f64,
    /// Fin del intervalo
    pub end_time: f64,
}

impl TimeSlot {
    /// Crea un intervalo de ejecución para un proceso.
    pub fn execution(process_id: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            owner: SlotOwner::Process(process_id.into()),
            start_time,
            end_time,
        }
    }

    /// Crea un intervalo de CPU ociosa.
    pub fn idle(start_time: f64, end_time: f64) -> Self {
        Self {
            owner: SlotOwner::Idle,
            start_time,
            end_time,
        }
    }

    /// Duración del intervalo.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Indica si el intervalo es de CPU ociosa.
    pub fn is_idle(&self) -> bool {
        matches!(self.owner, SlotOwner::Idle)
    }

    /// Identificador del proceso dueño, si el intervalo no es ocioso.
    pub fn process_id(&self) -> Option<&str> {
        match &self.owner {
            SlotOwner::Process(id) => Some(id),
            SlotOwner::Idle => None,
        }
    }
}

/// Secuencia ordenada de intervalos producida por una corrida.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.push_execution("P1", 0.0, 2.0);
/// timeline.push_idle(2.0, 5.0);
/// timeline.push_execution("P2", 5.0, 6.0);
///
/// assert_eq!(timeline.len(), 3);
/// assert_eq!(timeline.busy_time(), 3.0);
/// assert_eq!(timeline.end_time(), 6.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Timeline {
    slots: Vec<TimeSlot>,
}

impl Timeline {
    /// Crea una línea de tiempo vacía.
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un intervalo al final de la línea de tiempo.
    fn push(&mut self, slot: TimeSlot) {
        debug_assert!(slot.end_time > slot.start_time, "intervalo de duración no positiva");
        if let Some(last) = self.slots.last() {
            debug_assert!(slot.start_time >= last.end_time, "intervalo solapado o desordenado");
        }
        self.slots.push(slot);
    }

    /// Agrega un intervalo de ejecución.
    pub fn push_execution(&mut self, process_id: &str, start_time: f64, end_time: f64) {
        self.push(TimeSlot::execution(process_id, start_time, end_time));
    }

    /// Agrega un intervalo de ejecución fusionándolo con el último si es
    /// contiguo y pertenece al mismo proceso.
    ///
    /// Las políticas preemptivas reevalúan cada unidad de tiempo; cuando el
    /// mismo proceso retiene la CPU varias unidades seguidas, la línea de
    /// tiempo registra un único intervalo `[inicio, fin)` en lugar de una
    /// ristra de intervalos unitarios.
    pub fn push_execution_merged(&mut self, process_id: &str, start_time: f64, end_time: f64) {
        if let Some(last) = self.slots.last_mut() {
            if last.process_id() == Some(process_id) && last.end_time == start_time {
                last.end_time = end_time;
                return;
            }
        }
        self.push(TimeSlot::execution(process_id, start_time, end_time));
    }

    /// Agrega un intervalo de CPU ociosa.
    pub fn push_idle(&mut self, start_time: f64, end_time: f64) {
        self.push(TimeSlot::idle(start_time, end_time));
    }

    /// Intervalos de la línea de tiempo, en orden temporal.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Cantidad de intervalos registrados.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Indica si la línea de tiempo no tiene intervalos.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Suma de las duraciones de los intervalos no ociosos.
    pub fn busy_time(&self) -> f64 {
        self.slots
            .iter()
            .filter(|slot| !slot.is_idle())
            .map(TimeSlot::duration)
            .sum()
    }

    /// Fin del último intervalo, o 0 si la línea de tiempo está vacía.
    pub fn end_time(&self) -> f64 {
        self.slots.last().map(|slot| slot.end_time).unwrap_or(0.0)
    }
}
