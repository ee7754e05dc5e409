use rand::rngs::StdRng;
use rand::RngCore;
use rand::SeedableRng as _;

/// The random generator used to draw new points.
///
/// It either owns a fresh [`StdRng`] (see [`UniformSource::from_seed`] and
/// [`UniformSource::from_entropy`]) or borrows a generator owned by the caller
/// (see [`UniformSource::wrap_existing`]), in which case every draw advances
/// the caller's generator.
///
/// # Example
///
/// ```rust
/// use bbox_noise::UniformSource;
/// use rand::Rng as _;
///
/// let mut a = UniformSource::from_seed(42);
/// let mut b = UniformSource::from_seed(42);
/// assert_eq!(a.gen::<u64>(), b.gen::<u64>());
/// ```
#[derive(Debug)]
pub struct UniformSource<R = StdRng> {
    rng: R,
}

impl UniformSource<StdRng> {
    /// A deterministic generator, so that experiments are reproducible.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<'a, R> UniformSource<&'a mut R>
where
    R: RngCore + ?Sized,
{
    /// Borrow a generator owned by the caller.  Every draw made through the
    /// source advances that generator, so the caller sees its state move on.
    pub fn wrap_existing(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R> UniformSource<R> {
    /// The wrapped generator, in its current state.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R> RngCore for UniformSource<R>
where
    R: RngCore,
{
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
