//! Ejemplo básico de uso del simulador de planificación de CPU

use cpu_scheduler_simulator::{
    MetricsCalculator, Priority, Process, Scheduler, SchedulingPolicy,
};

fn main() {
    println!("=== Ejemplo: Uso Básico del Simulador ===\n");

    let processes = vec![
        Process::new("P1", 0.0, 5.0, Priority::Normal),
        Process::new("P2", 1.0, 3.0, Priority::High),
        Process::new("P3", 2.0, 1.0, Priority::Low),
    ];

    let scheduler = Scheduler::new(0.0);
    let calculator = MetricsCalculator::new(vec![5.0, 10.0]);

    for policy in SchedulingPolicy::all(2.0) {
        println!("--- {} ---", policy);

        let result = match scheduler.run(policy, processes.clone()) {
            Ok(result) => result,
            Err(error) => {
                println!("La corrida falló: {}\n", error);
                continue;
            }
        };

        println!("Línea de tiempo:");
        for slot in result.timeline().slots() {
            let owner = slot.process_id().unwrap_or("- OCIOSO -");
            println!("  [{:5.1} - {:5.1}] {}", slot.start_time, slot.end_time, owner);
        }

        if let Some(metrics) = calculator.calculate(&result) {
            println!("Espera promedio:     {:.3}", metrics.avg_waiting_time);
            println!("Turnaround promedio: {:.3}", metrics.avg_turnaround_time);
            println!("Cambios de contexto: {}", metrics.context_switches);
        }
        println!();
    }

    println!("Ejemplo completado.");
}
