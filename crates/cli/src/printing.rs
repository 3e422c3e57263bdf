use germinal_sim::simulation::{Configuration, ModelConfig, ResponseConfig};

pub fn describe_response(response: &ResponseConfig) -> String {
    match response {
        ResponseConfig::Constant { value } => format!("constant {value}"),
        ResponseConfig::Sigmoid {
            xscale,
            xshift,
            yscale,
            yshift,
        } => format!("sigmoid (xscale {xscale}, xshift {xshift}, yscale {yscale}, yshift {yshift})"),
        ResponseConfig::SequenceContext { intensity } => {
            format!("sequence context × {intensity}")
        }
        ResponseConfig::Scheduled {
            base,
            breakpoints,
            multipliers,
        } => format!(
            "{} scaled by {multipliers:?} at breakpoints {breakpoints:?}",
            describe_response(base)
        ),
    }
}

pub fn print_parameters(config: &Configuration) {
    let execution = &config.execution;
    let process = &config.process;

    println!("\n📋 Run Configuration");
    println!("  • Trees: {} [-n, --trees]", execution.num_trees);
    println!("  • Random Seed: {} [--seed]", execution.seed);
    println!(
        "  • Sampling Probability: {} [-p, --sampling-probability]",
        execution.retry.sampling_probability
    );
    println!(
        "  • Minimum Sampled Leaves: {} (up to {} attempts per tree)",
        execution.retry.min_sampled, execution.retry.max_attempts
    );

    println!("\n⏱  Branching Process");
    println!("  • Horizon: {} [--horizon]", process.evolve.horizon);
    match process.evolve.capacity {
        Some(capacity) => println!(
            "  • Capacity: {capacity} ({}) [--capacity, --capacity-method]",
            process.evolve.capacity_method
        ),
        None => println!("  • Capacity: unbounded [--no-capacity]"),
    }
    println!("  • Minimum Survivors: {}", process.evolve.min_survivors);
    println!("  • Birth: {}", describe_response(&process.birth));
    println!("  • Death: {}", describe_response(&process.death));
    println!("  • Mutation: {}", describe_response(&process.mutation));

    println!("\n🧬 Phenotype Model");
    match &config.model {
        ModelConfig::Discrete {
            state_space,
            initial_state,
            ..
        } => {
            println!("  • Discrete: {} states", state_space.len());
            if let Some(x) = state_space.get(*initial_state) {
                println!("  • Root Phenotype: {x} (state {initial_state})");
            }
        }
        ModelConfig::Sequence {
            naive_sequence,
            chain_boundary,
            mutability_path,
            dms_path,
            phenotype_column,
            ..
        } => {
            println!("  • Sequence: {} bp", naive_sequence.len());
            if let Some(boundary) = chain_boundary {
                println!("  • Second Chain Starts At: {boundary}");
            }
            match mutability_path {
                Some(path) => println!("  • Motif Tables: {}", path.display()),
                None => println!("  • Motif Tables: uniform"),
            }
            match dms_path {
                Some(path) => println!("  • GP Map: {} ({phenotype_column})", path.display()),
                None => println!("  • GP Map: neutral"),
            }
        }
    }
}
