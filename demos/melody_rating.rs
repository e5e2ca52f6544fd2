//! Rate generated melodies by hand. Each genome of a generation is printed
//! as MIDI pitches; type a rating from 0 to 5. The two best carry over. Each generation is
//! shuffled before rating so equal ratings do not always favour the elites.

use melody_genetics::{
    EvolutionConfig, Genome,
    algorithms::generational::GenerationalGA,
    fitness::CachedFitness,
    melody::{MelodyConfig, genome_to_melody},
};
use std::io::{self, BufRead, Write};

fn prompt(question: &str) -> io::Result<String> {
    print!("{question} ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn describe(genome: &Genome, melody_config: &MelodyConfig) -> String {
    match genome_to_melody(genome, melody_config) {
        Ok(melody) => melody
            .note_events()
            .iter()
            .map(|e| format!("{}:{}", e.pitch, e.duration))
            .collect::<Vec<_>>()
            .join(" "),
        Err(e) => format!("<{e}>"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let melody_config = MelodyConfig {
        num_bars: 2,
        ..MelodyConfig::default()
    };
    melody_config.validate()?;
    let config = EvolutionConfig {
        population_size: 6,
        genome_length: melody_config.genome_length(),
        ..EvolutionConfig::default()
    };
    let mut ga = GenerationalGA::from_config(&config)?;

    let mut rating = CachedFitness::new(|genome: &Genome| {
        println!("{}", describe(genome, &melody_config));
        loop {
            match prompt("Rating (0-5)").map(|r| r.parse::<i64>()) {
                Ok(Ok(score)) if (0..=5).contains(&score) => return score,
                Ok(_) => println!("please enter a number from 0 to 5"),
                Err(_) => return 0,
            }
        }
    });

    loop {
        ga.shuffle();
        let report = ga.step(&mut rating)?;
        println!("End of generation {}", report.generation);
        for (label, genome) in ["Best", "Second best"].iter().zip(&report.population) {
            println!("{label}: {}", describe(genome, &melody_config));
        }
        if prompt("Continue? [y/n]")? == "n" {
            break;
        }
        rating.clear();
    }
    Ok(())
}
