use anyhow::ensure;

/// An alignment tool (or tool configuration) under evaluation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tool {
    /// User provided name, also used in output file names
    name: String,
    /// Trust tier, lower is more trusted
    tier: i64
}

impl Tool {
    /// Constructor
    pub fn new(name: String, tier: i64) -> Self {
        Self { name, tier }
    }

    /// Pairs up parallel lists of names and tiers
    /// # Errors
    /// * if the two lists have different lengths
    pub fn from_parallel(names: &[String], tiers: &[i64]) -> anyhow::Result<Vec<Self>> {
        ensure!(
            names.len() == tiers.len(),
            "Number of tool names ({}) and tiers ({}) must be equal", names.len(), tiers.len()
        );
        Ok(names.iter().zip(tiers.iter())
            .map(|(name, &tier)| Self::new(name.clone(), tier))
            .collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> i64 {
        self.tier
    }
}

/// For each tool, the indices of all tools that are strictly more trusted and all tools that are equally trusted.
/// This is static for a whole run, so it gets built once up front.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierPartition {
    /// better_tiers[i] = { j : tier[j] < tier[i] }
    better_tiers: Vec<Vec<usize>>,
    /// equal_tiers[i] = { j : tier[j] == tier[i] }, which always contains i
    equal_tiers: Vec<Vec<usize>>
}

impl TierPartition {
    /// Builds the partition from an ordered list of tiers with a pair-wise scan.
    /// # Arguments
    /// * `tiers` - the tier for each tool index
    pub fn new(tiers: &[i64]) -> Self {
        let mut better_tiers = Vec::with_capacity(tiers.len());
        let mut equal_tiers = Vec::with_capacity(tiers.len());
        for &tier_i in tiers.iter() {
            let mut better = vec![];
            let mut equal = vec![];
            for (j, &tier_j) in tiers.iter().enumerate() {
                match tier_j.cmp(&tier_i) {
                    std::cmp::Ordering::Less => better.push(j),
                    std::cmp::Ordering::Equal => equal.push(j),
                    std::cmp::Ordering::Greater => {}
                }
            }
            better_tiers.push(better);
            equal_tiers.push(equal);
        }

        Self {
            better_tiers,
            equal_tiers
        }
    }

    /// Convenience wrapper that pulls the tiers out of a tool list
    pub fn from_tools(tools: &[Tool]) -> Self {
        let tiers: Vec<i64> = tools.iter().map(|t| t.tier()).collect();
        Self::new(&tiers)
    }

    /// Builds a partition from explicit index sets, mostly useful for testing specific layouts.
    /// # Errors
    /// * if the two lists have different lengths
    /// * if any index is out of range
    /// * if a tool appears in both its own better and equal sets
    pub fn from_sets(better_tiers: Vec<Vec<usize>>, equal_tiers: Vec<Vec<usize>>) -> anyhow::Result<Self> {
        let num_tools = better_tiers.len();
        ensure!(equal_tiers.len() == num_tools, "Better and equal tier lists must have the same length");
        for (i, (better, equal)) in better_tiers.iter().zip(equal_tiers.iter()).enumerate() {
            ensure!(
                better.iter().chain(equal.iter()).all(|&j| j < num_tools),
                "Tier sets for tool #{i} contain an index >= {num_tools}"
            );
            ensure!(
                better.iter().all(|j| !equal.contains(j)),
                "Tier sets for tool #{i} are not disjoint"
            );
        }
        Ok(Self {
            better_tiers,
            equal_tiers
        })
    }

    pub fn num_tools(&self) -> usize {
        self.better_tiers.len()
    }

    pub fn better_tiers(&self, index: usize) -> &[usize] {
        &self.better_tiers[index]
    }

    pub fn equal_tiers(&self, index: usize) -> &[usize] {
        &self.equal_tiers[index]
    }
}
