use acs_instance::Tour;

/// Directed trail strengths between every pair of nodes.
///
/// Trails start at `1 / n` and only ever change through [`update`], which
/// multiplies every entry by `decay` and then adds `1 / length` along each
/// directed edge of each tour. Entries stay non-negative.
///
/// [`update`]: PheromoneField::update
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    num_nodes: usize,
    trails: Vec<f64>,
}

impl PheromoneField {
    pub fn new(num_nodes: usize) -> Self {
        Self::with_initial(num_nodes, Self::initial_level(num_nodes))
    }

    pub fn with_initial(num_nodes: usize, level: f64) -> Self {
        Self {
            num_nodes,
            trails: vec![level; num_nodes * num_nodes],
        }
    }

    pub fn initial_level(num_nodes: usize) -> f64 {
        1.0 / num_nodes as f64
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.trails[from * self.num_nodes + to]
    }

    #[inline]
    pub fn row(&self, from: usize) -> &[f64] {
        &self.trails[from * self.num_nodes..(from + 1) * self.num_nodes]
    }

    pub fn evaporate(&mut self, decay: f64) {
        for trail in self.trails.iter_mut() {
            *trail *= decay;
        }
    }

    /// Reinforces the tour's directed edges, closing edge included. The
    /// reverse direction is left untouched.
    pub fn deposit(&mut self, tour: &Tour) {
        let amount = 1.0 / tour.length();
        for (from, to) in tour.edges() {
            self.trails[from * self.num_nodes + to] += amount;
        }
    }

    /// One generation's update: global evaporation, then one deposit per tour.
    pub fn update(&mut self, decay: f64, tours: &[Tour]) {
        self.evaporate(decay);
        for tour in tours {
            self.deposit(tour);
        }
    }
}
