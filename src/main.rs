use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use grove_data::{
    ClassificationDataset, ConfusionMatrix, DatasetReader, accuracy, make_classification,
    make_regression, mean_squared_error,
};
use grove_linear::{LinearRegression, LogisticRegression};
use grove_rf::{
    DecisionTreeClassifier, DecisionTreeConfig, FeatureSampling, MaxFeatures, OobMode,
    RandomForestClassifier, RandomForestConfig, SplitCriterion,
};

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Decision trees, random forests and gradient-descent regressors")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for splitting, generators and training
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Parameters of the synthetic classification generator.
#[derive(Args, Debug, Clone)]
struct SyntheticArgs {
    /// Generate a dataset instead of reading --data
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Rows to generate
    #[arg(long, default_value_t = 300)]
    n_samples: usize,

    /// Feature columns to generate
    #[arg(long, default_value_t = 10)]
    n_features: usize,

    /// Leading columns that carry class signal
    #[arg(long, default_value_t = 3)]
    n_informative: usize,

    /// Number of classes to generate
    #[arg(long, default_value_t = 3)]
    n_classes: usize,
}

/// Gradient descent parameters shared by the linear models.
#[derive(Args, Debug, Clone)]
struct DescentArgs {
    /// Gradient descent step size
    #[arg(long, default_value_t = 0.01)]
    learning_rate: f64,

    /// Number of gradient descent iterations
    #[arg(long, default_value_t = 1000)]
    n_iters: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Train a decision tree and a random forest and report test accuracy
    Classify {
        /// Path to a CSV whose last column is the class label
        #[arg(long, required_unless_present = "synthetic", conflicts_with = "synthetic")]
        data: Option<PathBuf>,

        #[command(flatten)]
        synthetic: SyntheticArgs,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,

        /// Maximum tree depth
        #[arg(long, default_value_t = 10)]
        max_depth: usize,

        /// Minimum samples required to split a node
        #[arg(long, default_value_t = 2)]
        min_samples_split: usize,

        /// Split criterion: "gini" or "entropy"
        #[arg(long, default_value = "gini")]
        criterion: String,

        /// Number of trees in the Random Forest
        #[arg(long, default_value_t = 20)]
        n_trees: usize,

        /// Features per tree or split: "sqrt", "log2", "all", or a count
        #[arg(long, default_value = "sqrt")]
        max_features: String,

        /// Feature subsampling: "per-tree" or "per-split"
        #[arg(long, default_value = "per-tree")]
        feature_sampling: String,

        /// Compute out-of-bag accuracy
        #[arg(long, default_value_t = false)]
        oob: bool,

        /// Number of most important features to report
        #[arg(long, default_value_t = 5)]
        top_features: usize,
    },

    /// Train binary logistic regression and report test accuracy
    Logistic {
        /// Path to a CSV whose last column holds exactly two classes
        #[arg(long)]
        data: PathBuf,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,

        #[command(flatten)]
        descent: DescentArgs,
    },

    /// Train linear regression and report test mean squared error
    Regress {
        /// Path to a CSV whose last column is numeric (synthetic data if absent)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,

        /// Rows to generate when --data is absent
        #[arg(long, default_value_t = 100)]
        n_samples: usize,

        /// Gaussian noise standard deviation when --data is absent
        #[arg(long, default_value_t = 20.0)]
        noise: f64,

        #[command(flatten)]
        descent: DescentArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ClassifyOutput {
    n_train: usize,
    n_test: usize,
    n_features: usize,
    class_names: Vec<String>,
    tree: TreeOutput,
    forest: ForestOutput,
}

#[derive(Serialize)]
struct TreeOutput {
    test_accuracy: f64,
    depth: usize,
    n_leaves: usize,
}

#[derive(Serialize)]
struct ForestOutput {
    test_accuracy: f64,
    macro_f1: f64,
    oob_accuracy: Option<f64>,
    n_trees: usize,
    max_features: usize,
    top_features: Vec<FeatureOutput>,
    confusion_matrix: Vec<Vec<usize>>,
}

#[derive(Serialize)]
struct FeatureOutput {
    rank: usize,
    name: String,
    importance: f64,
}

#[derive(Serialize)]
struct LogisticOutput {
    n_train: usize,
    n_test: usize,
    positive_class: String,
    test_accuracy: f64,
    weights: Vec<f64>,
    bias: f64,
}

#[derive(Serialize)]
struct RegressOutput {
    n_train: usize,
    n_test: usize,
    synthetic: bool,
    test_mse: f64,
    weights: Vec<f64>,
    bias: f64,
    true_coefficients: Option<Vec<f64>>,
}

fn parse_criterion(s: &str) -> Result<SplitCriterion> {
    match s {
        "gini" => Ok(SplitCriterion::Gini),
        "entropy" => Ok(SplitCriterion::Entropy),
        other => anyhow::bail!("unknown criterion: {other} (expected gini or entropy)"),
    }
}

fn parse_max_features(s: &str) -> Result<MaxFeatures> {
    match s {
        "sqrt" => Ok(MaxFeatures::Sqrt),
        "log2" => Ok(MaxFeatures::Log2),
        "all" => Ok(MaxFeatures::All),
        other => other
            .parse::<usize>()
            .map(MaxFeatures::Fixed)
            .with_context(|| {
                format!("unknown max features: {other} (expected sqrt, log2, all, or a count)")
            }),
    }
}

fn parse_feature_sampling(s: &str) -> Result<FeatureSampling> {
    match s {
        "per-tree" => Ok(FeatureSampling::PerTree),
        "per-split" => Ok(FeatureSampling::PerSplit),
        other => {
            anyhow::bail!("unknown feature sampling: {other} (expected per-tree or per-split)")
        }
    }
}

fn load_classification(
    data: Option<&PathBuf>,
    synthetic: &SyntheticArgs,
    seed: u64,
) -> Result<ClassificationDataset> {
    match data {
        Some(path) => DatasetReader::new(path)
            .read_classification()
            .context("failed to read input CSV"),
        None => make_classification(
            synthetic.n_samples,
            synthetic.n_features,
            synthetic.n_informative,
            synthetic.n_classes,
            seed,
        )
        .context("failed to generate synthetic dataset"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Classify {
            data,
            synthetic,
            test_fraction,
            max_depth,
            min_samples_split,
            criterion,
            n_trees,
            max_features,
            feature_sampling,
            oob,
            top_features,
        } => {
            let criterion = parse_criterion(&criterion)?;

            // 1. Load and split
            let dataset = load_classification(data.as_ref(), &synthetic, cli.seed)?;
            let (train, test) = dataset.split(test_fraction, cli.seed)?;
            info!(n_train = train.n_samples(), n_test = test.n_samples(), "dataset split");

            // 2. Single tree
            let tree_config = DecisionTreeConfig::new(max_depth)?
                .with_min_samples_split(min_samples_split)
                .with_criterion(criterion)
                .with_seed(cli.seed);
            let mut tree = DecisionTreeClassifier::new(tree_config);
            tree.fit(train.features(), train.labels())
                .context("decision tree training failed")?;
            let tree_accuracy = accuracy(test.labels(), &tree.predict(test.features())?)?;
            let fitted_tree = tree.fitted()?;
            info!(
                test_accuracy = tree_accuracy,
                depth = fitted_tree.depth(),
                "decision tree evaluated"
            );

            // 3. Forest
            let oob_mode = if oob { OobMode::Enabled } else { OobMode::Disabled };
            let forest_config = RandomForestConfig::new(n_trees)?
                .with_max_features(parse_max_features(&max_features)?)
                .with_feature_sampling(parse_feature_sampling(&feature_sampling)?)
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split)
                .with_criterion(criterion)
                .with_oob_mode(oob_mode)
                .with_seed(cli.seed);
            let mut forest = RandomForestClassifier::new(forest_config);
            forest
                .fit(train.features(), train.labels())
                .context("random forest training failed")?;
            let forest_preds = forest.predict(test.features())?;
            let forest_accuracy = accuracy(test.labels(), &forest_preds)?;
            let confusion =
                ConfusionMatrix::from_labels(test.labels(), &forest_preds, dataset.n_classes())?;
            let result = forest.fitted()?;
            let oob_accuracy = result.oob_score().map(|s| s.accuracy);
            info!(
                test_accuracy = forest_accuracy,
                oob_accuracy = ?oob_accuracy,
                "random forest evaluated"
            );

            // 4. Print summary
            let output = ClassifyOutput {
                n_train: train.n_samples(),
                n_test: test.n_samples(),
                n_features: dataset.feature_names().len(),
                class_names: dataset.class_names().to_vec(),
                tree: TreeOutput {
                    test_accuracy: tree_accuracy,
                    depth: fitted_tree.depth(),
                    n_leaves: fitted_tree.n_leaves(),
                },
                forest: ForestOutput {
                    test_accuracy: forest_accuracy,
                    macro_f1: confusion.macro_f1(),
                    oob_accuracy,
                    n_trees: result.metadata().n_trees,
                    max_features: result.metadata().max_features_resolved,
                    top_features: result
                        .importances()
                        .iter()
                        .take(top_features)
                        .map(|f| FeatureOutput {
                            rank: f.rank,
                            name: dataset.feature_names()[f.feature].clone(),
                            importance: f.importance,
                        })
                        .collect(),
                    confusion_matrix: confusion.as_rows().to_vec(),
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Logistic {
            data,
            test_fraction,
            descent,
        } => {
            // 1. Load and split
            let dataset = DatasetReader::new(&data)
                .read_classification()
                .context("failed to read input CSV")?;
            if dataset.n_classes() != 2 {
                anyhow::bail!(
                    "logistic regression needs exactly 2 classes, found {}: {:?}",
                    dataset.n_classes(),
                    dataset.class_names()
                );
            }
            let (train, test) = dataset.split(test_fraction, cli.seed)?;

            // 2. Train and evaluate
            let mut clf =
                LogisticRegression::new(descent.learning_rate)?.with_n_iters(descent.n_iters);
            clf.fit(train.features(), train.labels())
                .context("logistic regression training failed")?;
            let test_accuracy = accuracy(test.labels(), &clf.predict(test.features())?)?;
            info!(test_accuracy, "logistic regression evaluated");

            let output = LogisticOutput {
                n_train: train.n_samples(),
                n_test: test.n_samples(),
                positive_class: dataset.class_names()[1].clone(),
                test_accuracy,
                weights: clf.weights()?.to_vec(),
                bias: clf.bias()?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Regress {
            data,
            test_fraction,
            n_samples,
            noise,
            descent,
        } => {
            // 1. Load or generate, then split
            let (dataset, true_coefficients) = match &data {
                Some(path) => (
                    DatasetReader::new(path)
                        .read_regression()
                        .context("failed to read input CSV")?,
                    None,
                ),
                None => {
                    let (ds, coef) = make_regression(n_samples, 1, noise, cli.seed)
                        .context("failed to generate synthetic dataset")?;
                    (ds, Some(coef))
                }
            };
            let (train, test) = dataset.split(test_fraction, cli.seed)?;

            // 2. Train and evaluate
            let mut reg =
                LinearRegression::new(descent.learning_rate)?.with_n_iters(descent.n_iters);
            reg.fit(train.features(), train.targets())
                .context("linear regression training failed")?;
            let test_mse = mean_squared_error(test.targets(), &reg.predict(test.features())?)?;
            info!(test_mse, "linear regression evaluated");

            let output = RegressOutput {
                n_train: train.n_samples(),
                n_test: test.n_samples(),
                synthetic: data.is_none(),
                test_mse,
                weights: reg.weights()?.to_vec(),
                bias: reg.bias()?,
                true_coefficients,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
