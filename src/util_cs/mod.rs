//! The `util_cs` module provides constraint systems for checking large circuits.
use bellpepper_core::{ConstraintSystem, Index, LinearCombination, SynthesisError, Variable};
use ff::PrimeField;

/// A `ConstraintSystem` which evaluates every constraint against the witness as soon as it is
/// enforced and keeps only the assignment.
///
/// It records the path of the first unsatisfied constraint, like `TestConstraintSystem`, but
/// stores neither the constraints nor the names, so circuits with millions of constraints can be
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatisfyingConstraintSystem<Scalar: PrimeField> {
  input_assignment: Vec<Scalar>,
  aux_assignment: Vec<Scalar>,
  current_namespace: Vec<String>,
  num_constraints: usize,
  first_unsatisfied: Option<String>,
}

fn eval_lc<Scalar: PrimeField>(
  terms: &LinearCombination<Scalar>,
  inputs: &[Scalar],
  aux: &[Scalar],
) -> Scalar {
  let mut acc = Scalar::ZERO;

  for (var, coeff) in terms.iter() {
    let mut tmp = match var.get_unchecked() {
      Index::Input(index) => inputs[index],
      Index::Aux(index) => aux[index],
    };

    tmp.mul_assign(coeff);
    acc.add_assign(&tmp);
  }

  acc
}

impl<Scalar: PrimeField> SatisfyingConstraintSystem<Scalar> {
  /// Returns true if every constraint enforced so far holds
  pub fn is_satisfied(&self) -> bool {
    self.first_unsatisfied.is_none()
  }

  /// The path of the first constraint that failed, if any
  pub fn which_is_unsatisfied(&self) -> Option<&str> {
    self.first_unsatisfied.as_deref()
  }

  /// Returns the number of constraints enforced so far
  pub fn num_constraints(&self) -> usize {
    self.num_constraints
  }

  /// Returns the number of inputs, including the constant one
  pub fn num_inputs(&self) -> usize {
    self.input_assignment.len()
  }

  /// Returns the number of auxiliary variables
  pub fn num_aux(&self) -> usize {
    self.aux_assignment.len()
  }

  /// Get input assignment
  pub fn input_assignment(&self) -> &[Scalar] {
    &self.input_assignment
  }

  /// Get aux assignment
  pub fn aux_assignment(&self) -> &[Scalar] {
    &self.aux_assignment
  }

  fn path(&self, name: String) -> String {
    self
      .current_namespace
      .iter()
      .cloned()
      .chain(std::iter::once(name))
      .collect::<Vec<_>>()
      .join("/")
  }
}

impl<Scalar: PrimeField> Default for SatisfyingConstraintSystem<Scalar> {
  fn default() -> Self {
    Self {
      input_assignment: vec![Scalar::ONE],
      aux_assignment: vec![],
      current_namespace: vec![],
      num_constraints: 0,
      first_unsatisfied: None,
    }
  }
}

impl<Scalar: PrimeField> ConstraintSystem<Scalar> for SatisfyingConstraintSystem<Scalar> {
  type Root = Self;

  fn new() -> Self {
    Self::default()
  }

  fn alloc<F, A, AR>(&mut self, _: A, f: F) -> Result<Variable, SynthesisError>
  where
    F: FnOnce() -> Result<Scalar, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    self.aux_assignment.push(f()?);

    Ok(Variable::new_unchecked(Index::Aux(
      self.aux_assignment.len() - 1,
    )))
  }

  fn alloc_input<F, A, AR>(&mut self, _: A, f: F) -> Result<Variable, SynthesisError>
  where
    F: FnOnce() -> Result<Scalar, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    self.input_assignment.push(f()?);

    Ok(Variable::new_unchecked(Index::Input(
      self.input_assignment.len() - 1,
    )))
  }

  fn enforce<A, AR, LA, LB, LC>(&mut self, annotation: A, a: LA, b: LB, c: LC)
  where
    A: FnOnce() -> AR,
    AR: Into<String>,
    LA: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
    LB: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
    LC: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
  {
    self.num_constraints += 1;
    if self.first_unsatisfied.is_some() {
      return;
    }

    let (inputs, aux) = (&self.input_assignment, &self.aux_assignment);
    let mut a = eval_lc(&a(LinearCombination::zero()), inputs, aux);
    let b = eval_lc(&b(LinearCombination::zero()), inputs, aux);
    let c = eval_lc(&c(LinearCombination::zero()), inputs, aux);
    a.mul_assign(&b);

    if a != c {
      let path = self.path(annotation().into());
      tracing::warn!(%path, "unsatisfied constraint");
      self.first_unsatisfied = Some(path);
    }
  }

  fn push_namespace<NR, N>(&mut self, name_fn: N)
  where
    NR: Into<String>,
    N: FnOnce() -> NR,
  {
    self.current_namespace.push(name_fn().into());
  }

  fn pop_namespace(&mut self) {
    self.current_namespace.pop();
  }

  fn get_root(&mut self) -> &mut Self::Root {
    self
  }
}
