use evoneat::{
    logging::Stats, Genome, PopulationConfig, ReproductionConfig, SpeciationConfig,
    StagnationCriterion, TerminationReason,
};
use evoneat_nn::genomics::{ConnectionScheme, GeneticConfig, NNGenome};
use evoneat_nn::networks::FeedForwardNetwork;
use evoneat_nn::{NNPopulation, NeatConfig};
use log::{info, warn};
use ron::ser::PrettyConfig;

use std::convert::Infallible;
use std::error::Error;
use std::num::NonZeroUsize;
use std::{env, fs};

const XOR: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

const GENERATION_CAP: usize = 300;

/// 4 minus the sum of squared errors over the XOR truth table.
fn evaluate_xor(genome: &NNGenome) -> f32 {
    let network = match FeedForwardNetwork::new(genome) {
        Ok(network) => network,
        Err(e) => {
            warn!("unevaluable genome: {}", e);
            return 0.0;
        }
    };

    let error: f32 = XOR
        .iter()
        .map(|(input, expected)| match network.evaluate(input) {
            Ok(output) => (output[0] - expected).powi(2),
            Err(_) => 1.0,
        })
        .sum();
    4.0 - error
}

fn default_config() -> NeatConfig {
    let genome = GeneticConfig {
        inputs: NonZeroUsize::new(2).unwrap(),
        outputs: NonZeroUsize::new(1).unwrap(),
        connection_scheme: ConnectionScheme::Full,
        bias_init_stdev: 1.0,
        bias_min_value: -30.0,
        bias_max_value: 30.0,
        bias_mutation_chance: 0.7,
        bias_replace_chance: 0.1,
        bias_mutation_power: 0.5,
        weight_init_stdev: 1.0,
        weight_min_value: -30.0,
        weight_max_value: 30.0,
        weight_mutation_chance: 0.8,
        weight_replace_chance: 0.1,
        weight_mutation_power: 0.5,
        link_mutation_chance: 1.0,
        link_addition_chance: 0.5,
        link_deletion_chance: 0.5,
        node_mutation_chance: 1.0,
        node_addition_chance: 0.2,
        node_deletion_chance: 0.2,
        reenable_chance: 0.25,
        ..GeneticConfig::zero()
    };
    let mut population = PopulationConfig {
        reset_on_extinction: true,
        speciation: SpeciationConfig {
            compatibility_disjoint_coefficient: 1.0,
            compatibility_weight_coefficient: 0.5,
            compatibility_threshold: 3.0,
            max_stagnation: 20,
            survival_rate: 0.2,
            elitism: 2,
            stagnation_criterion: StagnationCriterion::Absolute,
        },
        reproduction: ReproductionConfig {
            crossover_rate: 0.75,
            inter_species_crossover_rate: 0.001,
            max_stagnation: 20,
            survival_rate: 0.2,
            elitism: 2,
            elitism_threshold: 5,
            min_species_size: NonZeroUsize::new(2).unwrap(),
            ..ReproductionConfig::zero()
        },
        ..PopulationConfig::zero()
    }
    .with_size(NonZeroUsize::new(150).unwrap());
    population.evaluation.fitness_threshold = 3.9;

    NeatConfig { population, genome }
}

fn load_config(path: Option<&str>) -> Result<NeatConfig, Box<dyn Error>> {
    Ok(match path {
        Some(path) => ron::from_str(&fs::read_to_string(path)?)?,
        None => default_config(),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["config"] => {
            println!(
                "{}",
                ron::ser::to_string_pretty(&default_config(), PrettyConfig::new())?
            );
        }
        ["stress", iterations, rest @ ..] => {
            stress_test(load_config(rest.first().copied())?, iterations.parse()?)?
        }
        ["serde", rest @ ..] => serde_test(load_config(rest.first().copied())?)?,
        [rest @ ..] => single_run(load_config(rest.first().copied())?)?,
    }
    Ok(())
}

fn single_run(config: NeatConfig) -> Result<(), Box<dyn Error>> {
    let summary = evoneat_nn::run(
        config,
        |genome| Ok::<_, Infallible>(evaluate_xor(genome)),
        NonZeroUsize::new(GENERATION_CAP),
    )?;

    println!(
        "{:?} after {} generations, champion fitness {:.4}",
        summary.reason,
        summary.generations,
        summary.champion.fitness()
    );
    println!("{}", summary.champion);
    println!(
        "{}",
        ron::ser::to_string_pretty(&summary.champion, PrettyConfig::new())?
    );
    Ok(())
}

/// Runs `iterations` seeded populations and reports how
/// often, and how fast, they solve XOR.
fn stress_test(config: NeatConfig, iterations: u64) -> Result<(), Box<dyn Error>> {
    let mut generations = vec![];
    for seed in 0..iterations {
        let mut population =
            NNPopulation::with_seed(config.population.clone(), config.genome.clone(), seed)?;
        let summary = population.run(
            |genome| Ok::<_, Infallible>(evaluate_xor(genome)),
            NonZeroUsize::new(GENERATION_CAP),
        )?;
        info!("seed {}: {:?}", seed, summary.reason);
        generations.push(
            (summary.reason == TerminationReason::FitnessThreshold).then(|| summary.generations),
        );
    }

    println!(
        "Successful run generation count {:?}, {}% failure rate over {} iterations",
        Stats::from(generations.iter().flatten().map(|&g| g as f32)),
        generations.iter().filter(|g| g.is_none()).count() as f32 * 100.0 / iterations as f32,
        iterations
    );
    Ok(())
}

/// Evolves for a while, saves the population as RON, and
/// carries on evolving the restored copy.
fn serde_test(config: NeatConfig) -> Result<(), Box<dyn Error>> {
    let mut population = NNPopulation::with_seed(config.population, config.genome, 0)?;
    for _ in 0..10 {
        population.evaluate_fitness(evaluate_xor);
        if let Err(e) = population.evolve() {
            warn!("{}", e);
            population.reset();
        }
    }

    let saved = ron::to_string(&population)?;
    let mut population: NNPopulation = ron::from_str(&saved)?;
    println!("restored population at generation {}", population.generation());

    let summary = population.run(
        |genome| Ok::<_, Infallible>(evaluate_xor(genome)),
        NonZeroUsize::new(GENERATION_CAP),
    )?;
    println!(
        "{:?} after {} more generations: {}",
        summary.reason, summary.generations, summary.champion
    );
    Ok(())
}
