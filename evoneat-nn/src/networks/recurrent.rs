use super::{Layout, NetworkError, NodeEvaluation};
use crate::genomics::NNGenome;

use std::mem;

/// A network that can express any genome, cycles included.
///
/// The network keeps a value per node. At each activation
/// every computed node is updated synchronously from the
/// values of the previous step, so a signal travels one
/// connection per activation.
///
/// For real-time use, set the inputs and activate once per
/// time step, reading the outputs after each activation. For
/// one-shot use, [`evaluate`](RecurrentNetwork::evaluate)
/// runs a fixed number of steps from a cleared state.
#[derive(Clone, Debug)]
pub struct RecurrentNetwork {
    layout: Layout,
    evaluations: Box<[NodeEvaluation]>,
    values: Vec<f32>,
    next: Vec<f32>,
    steps: usize,
}

impl RecurrentNetwork {
    /// Builds the network expressed by `genome`, evaluating
    /// with one step per non-input node.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, ConnectionGene, GeneticConfig, NNGenome};
    /// use evoneat_nn::networks::RecurrentNetwork;
    ///
    /// let config = GeneticConfig {
    ///     activator_default: ActivationType::Identity,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = NNGenome::minimal(&config);
    /// genome.add_connection(ConnectionGene::new(0, 0, 1, 1.0)).unwrap();
    /// genome.add_connection(ConnectionGene::new(1, 1, 1, 1.0)).unwrap();
    ///
    /// // The output accumulates its input.
    /// let mut network = RecurrentNetwork::new(&genome);
    /// network.set_inputs(&[0.5]).unwrap();
    /// network.activate();
    /// network.activate();
    /// assert_eq!(network.outputs(), [1.0]);
    /// ```
    pub fn new(genome: &NNGenome) -> RecurrentNetwork {
        let layout = Layout::new(genome);
        let evaluations: Box<[NodeEvaluation]> = genome
            .nodes()
            .filter(|node| node.node_type().is_computed())
            .map(|node| layout.evaluation(genome, node))
            .collect();
        let steps = layout.len() - layout.inputs.len();

        let mut network = RecurrentNetwork {
            values: vec![0.0; layout.len()],
            next: vec![0.0; layout.len()],
            layout,
            evaluations,
            steps,
        };
        network.clear_state();
        network
    }

    /// Sets the number of steps run by
    /// [`evaluate`](RecurrentNetwork::evaluate).
    pub fn with_steps(mut self, steps: usize) -> RecurrentNetwork {
        self.steps = steps;
        self
    }

    /// Returns the number of steps run by
    /// [`evaluate`](RecurrentNetwork::evaluate).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Sets the values of the input nodes, in identifier order.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputCount`] if `inputs` does
    /// not hold exactly one value per input node.
    pub fn set_inputs(&mut self, inputs: &[f32]) -> Result<(), NetworkError> {
        if inputs.len() != self.layout.inputs.len() {
            return Err(NetworkError::InputCount {
                expected: self.layout.inputs.len(),
                actual: inputs.len(),
            });
        }
        for (&slot, &value) in self.layout.inputs.iter().zip(inputs) {
            self.values[slot] = value;
        }
        Ok(())
    }

    /// Advances the network by one time step.
    pub fn activate(&mut self) {
        Self::step(&self.evaluations, &self.values, &mut self.next);
        mem::swap(&mut self.values, &mut self.next);
    }

    /// Returns the current values of the output nodes,
    /// in identifier order.
    pub fn outputs(&self) -> Vec<f32> {
        self.layout.outputs(&self.values)
    }

    /// Resets every node value to 0, except bias nodes,
    /// which stay at 1.
    pub fn clear_state(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
        for &slot in self.layout.biases.iter() {
            self.values[slot] = 1.0;
        }
    }

    /// Returns the outputs after running the configured
    /// number of steps on `inputs`, starting from a cleared
    /// state. The network's own state is left untouched.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputCount`] if `inputs` does
    /// not hold exactly one value per input node.
    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        let mut values = self.layout.initial_values(inputs)?;
        let mut next = values.clone();
        for _ in 0..self.steps {
            Self::step(&self.evaluations, &values, &mut next);
            mem::swap(&mut values, &mut next);
        }
        Ok(self.layout.outputs(&values))
    }

    fn step(evaluations: &[NodeEvaluation], values: &[f32], next: &mut [f32]) {
        next.copy_from_slice(values);
        let mut buffer = Vec::new();
        for evaluation in evaluations {
            next[evaluation.slot] = evaluation.evaluate(values, &mut buffer);
        }
    }
}
