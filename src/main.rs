use std::env;
use std::path::PathBuf;
use std::process::exit;

use cpu_scheduler_simulator::{config, ResultGenerator, Simulation};

/// Opciones de línea de comandos del simulador.
#[derive(Debug)]
struct CliOptions {
    /// Archivos de escenario a procesar
    scenarios: Vec<PathBuf>,
    /// Procesar los escenarios en paralelo (un hilo por archivo)
    parallel: bool,
    /// Costo de cada cambio de contexto
    context_switch_time: f64,
    /// Quantum para Round Robin
    quantum: f64,
    /// Directorio de salida de los reportes
    results_dir: PathBuf,
}

/// Parseo de CLI: banderas opcionales seguidas de los archivos de escenario.
fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        scenarios: Vec::new(),
        parallel: false,
        context_switch_time: config::DEFAULT_CONTEXT_SWITCH_TIME,
        quantum: config::DEFAULT_QUANTUM,
        results_dir: PathBuf::from(config::DEFAULT_RESULTS_DIR),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--hilos" => {
                options.parallel = true;
                i += 1;
            }
            "--context-switch" => {
                let value = args
                    .get(i + 1)
                    .ok_or("Falta el valor de --context-switch")?;
                options.context_switch_time = value
                    .parse()
                    .map_err(|_| format!("Costo de cambio de contexto inválido: {}", value))?;
                if options.context_switch_time < 0.0 {
                    return Err("El costo de cambio de contexto debe ser >= 0".to_string());
                }
                i += 2;
            }
            "--quantum" => {
                let value = args.get(i + 1).ok_or("Falta el valor de --quantum")?;
                options.quantum = value
                    .parse()
                    .map_err(|_| format!("Quantum inválido: {}", value))?;
                if options.quantum <= 0.0 {
                    return Err("El quantum debe ser > 0".to_string());
                }
                i += 2;
            }
            "--salida" => {
                let value = args.get(i + 1).ok_or("Falta el valor de --salida")?;
                options.results_dir = PathBuf::from(value);
                i += 2;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Bandera desconocida: {}", flag));
            }
            scenario => {
                options.scenarios.push(PathBuf::from(scenario));
                i += 1;
            }
        }
    }

    if options.scenarios.is_empty() {
        return Err("Debe indicarse al menos un archivo de escenario".to_string());
    }
    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!(
        "Uso:\n  {} [opciones] <escenario.csv> [<escenario.csv> ...]\n\n\
         Opciones:\n  \
         --hilos                 Procesar los escenarios en paralelo (un hilo por archivo)\n  \
         --context-switch <t>    Costo de cada cambio de contexto (por defecto {})\n  \
         --quantum <q>           Quantum para Round Robin (por defecto {})\n  \
         --salida <dir>          Directorio de salida (por defecto '{}')\n\n\
         Ejemplos:\n  \
         {} escenarios/caso1.csv\n  \
         {} --hilos --quantum 4 escenarios/*.csv",
        program,
        config::DEFAULT_CONTEXT_SWITCH_TIME,
        config::DEFAULT_QUANTUM,
        config::DEFAULT_RESULTS_DIR,
        program,
        program
    );
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let generator = ResultGenerator::new(&options.results_dir)?;
    let simulation = Simulation::with_config(
        options.context_switch_time,
        options.quantum,
        config::default_checkpoints(),
        generator,
    );
    simulation.run_cases(&options.scenarios, options.parallel)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bin");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("Error: {}\n", error);
            print_usage(program);
            exit(1);
        }
    };

    if let Err(error) = run(options) {
        eprintln!("Error: {:#}", error);
        exit(1);
    }
}
