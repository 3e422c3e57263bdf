//! Shared default values for simulation configuration.
//! These values are used by the `init` command (via clap) and by `trace`.

pub const CONFIG_PATH: &str = "config.json";
pub const OUT_DIR: &str = ".";
pub const UNPRUNED_FILE: &str = "trees-unpruned.json";
pub const PRUNED_FILE: &str = "trees.json";

// Execution
pub const NUM_TREES: usize = 260;
pub const SEED: u64 = 1;
pub const SAMPLING_PROBABILITY: f64 = 0.1;
pub const MIN_SAMPLED: usize = 1;

// Process
pub const HORIZON: f64 = 15.0;
pub const CAPACITY: usize = 1000;
pub const CAPACITY_METHOD: &str = "birth";
pub const MIN_SURVIVORS: usize = 1;

/// Sigmoid birth response as (xscale, xshift, yscale, yshift).
pub const BIRTH_SIGMOID: (f64, f64, f64, f64) = (1.5, -0.1, 2.5, 0.6);
pub const DEATH_RATE: f64 = 1.0;
pub const MUTATION_RATE: f64 = 1.0;

// Discrete model: affinity type space and the jump chain between its states
pub const TYPE_SPACE: [f64; 8] = [
    -2.4270176906430416,
    -1.4399117849363843,
    -0.6588015552361666,
    -0.13202968692343608,
    0.08165101396850624,
    0.7981793588605735,
    1.3526378568771724,
    2.1758707012574643,
];
pub const INITIAL_STATE: usize = 4;

/// Transition rates between affinity states; rows are renormalized by the
/// mutator.
pub const TRANSITION_MATRIX: [[f64; 8]; 8] = [
    [
        0.0,
        0.0033511313830736906,
        0.0004528555923072555,
        0.00027171335538435327,
        0.0003622844738458044,
        9.05711184614511e-05,
        9.05711184614511e-05,
        0.0,
    ],
    [
        0.2020753168875446,
        0.0,
        0.013881523240557529,
        0.0031729195978417207,
        0.0009915373743255376,
        0.00019830747486510755,
        0.0005949224245953227,
        0.0,
    ],
    [
        0.1102975726069481,
        0.15072536814415619,
        0.0,
        0.02263077684963278,
        0.004614041881963965,
        0.00021971628009352211,
        0.0,
        0.0,
    ],
    [
        0.0921587483881802,
        0.051134186307591235,
        0.0984589489934135,
        0.0,
        0.03618952440680526,
        0.00776536353668291,
        0.0,
        0.0,
    ],
    [
        0.0865376168167631,
        0.02461627223233437,
        0.06534732061676392,
        0.13285173725388705,
        0.0,
        0.01827187217245438,
        0.004441080041915994,
        0.0,
    ],
    [
        0.07206014315123183,
        0.021894379777512914,
        0.015304809164863396,
        0.048677795816023856,
        0.10096922712930713,
        0.0,
        0.024657748098946584,
        0.0,
    ],
    [
        0.05828029654047501,
        0.020704842192010856,
        0.00792407540681897,
        0.013291997456599564,
        0.048055683112321494,
        0.09968998092449673,
        0.0,
        0.005112306714076755,
    ],
    [
        0.06460275702939013,
        0.029816657090487753,
        0.00993888569682925,
        0.00993888569682925,
        0.00993888569682925,
        0.014908328545243876,
        0.16896105684609727,
        0.0,
    ],
];

// Sequence model: paired heavy and light chain naive sequence
pub const NAIVE_SEQUENCE: &str = concat!(
    "GAGGTGCAGCTTCAGGAGTCAGGACCTAGCCTCGTGAAACCTTCTCAGACTCTGTCCCTCACCTGTTCTGTCACTGGCGACTCC",
    "ATCACCAGTGGTTACTGGAACTGGATCCGGAAATTCCCAGGGAATAAACTTGAGTACATGGGGTACATAAGCTACAGTGGTAGC",
    "ACTTACTACAATCCATCTCTCAAAAGTCGAATCTCCATCACTCGAGACACATCCAAGAACCAGTACTACCTGCAGTTGAATTCT",
    "GTGACTACTGAGGACACAGCCACATATTACTGTGCAAGGGACTTCGATGTCTGGGGCGCAGGGACCACGGTCACCGTCTCCTCA",
    "GACATTGTGATGACTCAGTCTCAAAAATTCATGTCCACATCAGTAGGAGACAGGGTCAGCGTCACCTGCAAGGCCAGTCAGAAT",
    "GTGGGTACTAATGTAGCCTGGTATCAACAGAAACCAGGGCAATCTCCTAAAGCACTGATTTACTCGGCATCCTACAGGTACAGT",
    "GGAGTCCCTGATCGCTTCACAGGCAGTGGATCTGGGACAGATTTCACTCTCACCATCAGCAATGTGCAGTCTGAAGACTTGGCA",
    "GAGTATTTCTGTCAGCAATATAACAGCTATCCTCTCACGTTCGGCTCGGGGACTAAGCTAGAAATAAAA",
);
pub const CHAIN_BOUNDARY: usize = 336;
pub const MUTATION_INTENSITY: f64 = 1.0;
pub const PHENOTYPE_COLUMN: &str = "affinity";

// Trace
pub const TRACE_HORIZON: f64 = 200.0;
