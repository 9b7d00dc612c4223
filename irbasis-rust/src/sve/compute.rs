//! Main SVE computation functions

use crate::error::{IrError, Result};
use crate::kernel::{Kernel, SymmetryType};
use crate::kernelmatrix::even_odd_matrices;
use crate::numeric::{CustomNumeric, Df64};
use xprec_svd::{SVDResult, jacobi_svd};

use super::reconstruct::reconstruct_basis;
use super::result::{BasisFunctions, SVEResult};
use super::sections::{SECTION_CUTOFF, approximate_section_edges};
use super::types::{TworkType, choose_twork};

/// Parameters of the basis construction
#[derive(Debug, Clone, PartialEq)]
pub struct IrBasisConfig {
    /// Maximum number of basis functions
    pub max_dim: usize,
    /// Singular values below `cutoff * s_0` are dropped
    pub cutoff: f64,
    /// Legendre polynomials per section
    pub nl: usize,
    /// Gauss-Legendre nodes per section
    pub quadrature_order: usize,
    /// Points of the coarse discretization used to place section edges
    pub section_points: usize,
    /// Working precision
    pub twork: TworkType,
}

impl Default for IrBasisConfig {
    fn default() -> Self {
        Self {
            max_dim: usize::MAX,
            cutoff: 1e-12,
            nl: 10,
            quadrature_order: 12,
            section_points: 250,
            twork: TworkType::Auto,
        }
    }
}

impl IrBasisConfig {
    /// Default configuration limited to `max_dim` functions
    pub fn new(max_dim: usize) -> Self {
        Self {
            max_dim,
            ..Self::default()
        }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_nl(mut self, nl: usize) -> Self {
        self.nl = nl;
        self
    }

    pub fn with_quadrature_order(mut self, quadrature_order: usize) -> Self {
        self.quadrature_order = quadrature_order;
        self
    }

    pub fn with_section_points(mut self, section_points: usize) -> Self {
        self.section_points = section_points;
        self
    }

    pub fn with_twork(mut self, twork: TworkType) -> Self {
        self.twork = twork;
        self
    }

    /// Check the parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_dim == 0 {
            return Err(IrError::InvalidParameter(
                "max_dim must be positive".to_string(),
            ));
        }
        if !(self.cutoff > 0.0 && self.cutoff < 1.0) {
            return Err(IrError::InvalidParameter(format!(
                "cutoff must lie in (0, 1), got {}",
                self.cutoff
            )));
        }
        if self.nl == 0 || self.quadrature_order == 0 {
            return Err(IrError::InvalidParameter(format!(
                "nl ({}) and quadrature_order ({}) must be positive",
                self.nl, self.quadrature_order
            )));
        }
        if self.section_points < 2 {
            return Err(IrError::InvalidParameter(format!(
                "section_points must be at least 2, got {}",
                self.section_points
            )));
        }
        Ok(())
    }
}

/// Generate the IR basis of a kernel
///
/// Section edges are placed at the zeros of the highest even singular
/// functions of a coarse double precision expansion, then the accurate
/// expansion runs in the working precision chosen from `config.twork`.
///
/// # Returns
/// Singular values with the u and v functions on [-1, 1], or
/// `IrError::SingularValuesNotDecreasing` when the working precision cannot
/// resolve the requested cutoff.
pub fn generate_ir_basis<K: Kernel>(kernel: &K, config: &IrBasisConfig) -> Result<BasisFunctions> {
    config.validate()?;
    let (edges_x, edges_y) =
        approximate_section_edges(kernel, config.section_points, SECTION_CUTOFF)?;
    generate_ir_basis_with_sections(kernel, &edges_x, &edges_y, config)
}

/// Generate the IR basis on given half-domain partitions
///
/// # Arguments
/// * `edges_x`, `edges_y` - Strictly increasing section edges from 0 to 1
pub fn generate_ir_basis_with_sections<K: Kernel>(
    kernel: &K,
    edges_x: &[f64],
    edges_y: &[f64],
    config: &IrBasisConfig,
) -> Result<BasisFunctions> {
    config.validate()?;
    validate_half_edges(edges_x)?;
    validate_half_edges(edges_y)?;

    let basis = match choose_twork(config.cutoff, config.twork) {
        TworkType::Float64 => {
            let sve = compute_sve::<f64, K>(kernel, edges_x, edges_y, config)?;
            reconstruct_basis(&sve)?
        }
        _ => {
            let to_dd = |edges: &[f64]| edges.iter().map(|&e| Df64::from(e)).collect::<Vec<_>>();
            let sve = compute_sve::<Df64, K>(kernel, &to_dd(edges_x), &to_dd(edges_y), config)?;
            reconstruct_basis(&sve)?
        }
    };

    log::info!(
        "{} basis for lambda = {}: {} functions, {} sections",
        kernel.statistics(),
        kernel.lambda(),
        basis.len(),
        basis.u.first().map_or(0, |u| u.num_sections())
    );
    Ok(basis)
}

fn validate_half_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 || edges[0] != 0.0 || edges[edges.len() - 1] != 1.0 {
        return Err(IrError::InvalidParameter(format!(
            "half-domain section edges must run from 0 to 1, got {:?}",
            edges
        )));
    }
    if let Some(i) = (1..edges.len()).find(|&i| !(edges[i] > edges[i - 1])) {
        return Err(IrError::InvalidParameter(format!(
            "section edges must be strictly increasing (violated at index {})",
            i
        )));
    }
    Ok(())
}

/// Singular value expansion in the working precision T
///
/// Builds both sector matrices, decomposes them and keeps the triplets
/// selected by [`truncate`].
pub fn compute_sve<T, K>(
    kernel: &K,
    edges_x: &[T],
    edges_y: &[T],
    config: &IrBasisConfig,
) -> Result<SVEResult<T>>
where
    T: CustomNumeric,
    K: Kernel,
{
    let (even, odd) = compute_sector_svds(kernel, edges_x, edges_y, config)?;
    let selected = truncate(&even.s.to_vec(), &odd.s.to_vec(), config.max_dim, config.cutoff)?;

    let mut s = Vec::with_capacity(selected.len());
    let mut u = Vec::with_capacity(selected.len());
    let mut v = Vec::with_capacity(selected.len());
    for (symmetry, i) in selected {
        let svd = match symmetry {
            SymmetryType::Even => &even,
            SymmetryType::Odd => &odd,
        };
        s.push(svd.s[i]);
        u.push(svd.u.column(i).to_owned());
        v.push(svd.v.column(i).to_owned());
    }

    Ok(SVEResult {
        s,
        u,
        v,
        edges_x: edges_x.to_vec(),
        edges_y: edges_y.to_vec(),
        nl: config.nl,
    })
}

/// SVDs of the even and odd sector matrices
pub fn compute_sector_svds<T, K>(
    kernel: &K,
    edges_x: &[T],
    edges_y: &[T],
    config: &IrBasisConfig,
) -> Result<(SVDResult<T>, SVDResult<T>)>
where
    T: CustomNumeric,
    K: Kernel,
{
    let (even, odd) =
        even_odd_matrices(kernel, edges_x, edges_y, config.quadrature_order, config.nl)?;
    log::debug!(
        "decomposing {}x{} sector matrices",
        even.nrows(),
        even.ncols()
    );
    let (even_svd, odd_svd) = rayon::join(|| jacobi_svd(&even), || jacobi_svd(&odd));
    Ok((even_svd?, odd_svd?))
}

/// Select singular triplets from the two sectors
///
/// Walks both spectra in step, taking the even value before the odd value
/// at every rank, and stops at the first value below `cutoff` relative to
/// the largest even value or when `max_dim` values are taken. Position l of
/// the result comes from the even sector for even l and from the odd sector
/// for odd l.
///
/// # Returns
/// `(sector, index)` pairs, or `IrError::SingularValuesNotDecreasing` if the
/// selected values are out of order.
pub fn truncate<T: CustomNumeric>(
    even: &[T],
    odd: &[T],
    max_dim: usize,
    cutoff: f64,
) -> Result<Vec<(SymmetryType, usize)>> {
    let s0 = match even.first() {
        Some(&s0) if s0 > T::zero() => s0,
        _ => return Err(IrError::EmptyBasis),
    };
    let cutoff = T::from_f64(cutoff);

    let mut selected = Vec::new();
    let mut values: Vec<T> = Vec::new();
    'ranks: for i in 0..even.len() {
        for (symmetry, spectrum) in [(SymmetryType::Even, even), (SymmetryType::Odd, odd)] {
            match spectrum.get(i) {
                Some(&value) if selected.len() < max_dim && !(value / s0 < cutoff) => {
                    selected.push((symmetry, i));
                    values.push(value);
                }
                _ => break 'ranks,
            }
        }
    }

    if let Some(l) = (1..values.len()).find(|&l| values[l - 1] < values[l]) {
        return Err(IrError::SingularValuesNotDecreasing { index: l });
    }
    Ok(selected)
}
