use melody_genetics::{
    EvolutionConfig, Genome, algorithms::generational::GenerationalGA, observer::LogPrinter,
};

const BIT_COUNT: usize = 64;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EvolutionConfig::from_file(path)?,
        None => EvolutionConfig {
            population_size: 20,
            genome_length: BIT_COUNT,
            num_mutations: 1,
            mutation_probability: 0.5,
            fitness_limit: Some(BIT_COUNT as u64),
            generation_limit: 1000,
            seed: Some(42),
        },
    };

    let ga = GenerationalGA::from_config(&config)?;
    let mut ones = |g: &Genome| g.count_ones() as i64;

    println!("Evolving {}-bit all-ones genome...", config.genome_length);
    let (population, generation) = ga.run(&mut ones, &mut LogPrinter::default())?;
    let best = &population[0];

    if (best.count_ones() as u64) >= config.effective_fitness_limit() {
        println!("🎯 {best} found at generation {generation}");
    } else {
        println!("Gave up at generation {generation}, best so far: {best}");
    }
    Ok(())
}
