use bevy::prelude::*;

/// Side length of one grid cell in pixels. Every static object occupies
/// exactly one cell; pixel coordinates map to cells by floor division.
pub const TILE_SIZE: i32 = 32;

/// A cell address in the level grid. `x` is the column, `y` the row,
/// both growing right/down from the top-left corner of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned pixel rectangle in top-left screen coordinates.
/// Right and bottom edges are exclusive: a 32-wide box at x=0 covers
/// pixels 0..=31 and sits flush against a neighbor starting at x=32.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One full cell anchored at the given pixel position.
    pub fn tile(x: i32, y: i32) -> Self {
        Self::new(x, y, TILE_SIZE, TILE_SIZE)
    }

    /// One full cell at the given grid address.
    pub fn at_cell(cell: GridPos) -> Self {
        Self::tile(cell.x * TILE_SIZE, cell.y * TILE_SIZE)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center pixel, rounded down.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn center_vec(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Grid cell containing the top-left corner.
    pub fn grid_pos(&self) -> GridPos {
        GridPos::new(self.x.div_euclid(TILE_SIZE), self.y.div_euclid(TILE_SIZE))
    }

    /// Grid cell containing the center pixel. AI range checks use this
    /// so a mover halfway between cells reads as the cell it mostly covers.
    pub fn center_cell(&self) -> GridPos {
        let (cx, cy) = self.center();
        GridPos::new(cx.div_euclid(TILE_SIZE), cy.div_euclid(TILE_SIZE))
    }
}

/// The four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset in grid/pixel space (y grows downward).
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What an object is, for collision filtering and level round-trips.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Player,
    Wall,
    Turret,
    LittleRobot,
    Teleporter,
    Flag,
    Goal,
}

impl ObjectKind {
    pub fn is_enemy(&self) -> bool {
        matches!(self, ObjectKind::Turret | ObjectKind::LittleRobot)
    }
}

// Marker components for queries.
#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Wall;

#[derive(Component)]
pub struct Enemy;

#[derive(Component)]
pub struct Turret;

#[derive(Component)]
pub struct LittleRobot;

#[derive(Component)]
pub struct Flag;

#[derive(Component)]
pub struct Goal;

/// A picked-up flag. Carried objects leave the grid table and follow
/// their carrier, so they are excluded from collision scans.
#[derive(Component)]
pub struct Carried;

/// Exit pad. Inert while enemies remain; once the level is cleared it
/// activates and walking into it finishes the level.
#[derive(Component, Debug, Default)]
pub struct Teleporter {
    pub activated: bool,
}

/// Which way an object is pointing; also the swing plane for the sword.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub Direction);

/// Pixels moved per update tick while a movement key is held.
#[derive(Component, Debug, Clone, Copy)]
pub struct Speed(pub i32);

/// Entity id of the flag the player is carrying, if any.
#[derive(Component, Debug, Default)]
pub struct HeldFlag(pub Option<Entity>);

/// A projectile in flight. Position is tracked in floats so slow
/// trajectories accumulate sub-pixel motion; the entity's `Bounds` is
/// re-derived from it every tick for collision checks.
#[derive(Component, Debug)]
pub struct Laser {
    pub pos: Vec2,
    pub trajectory: Vec2,
    pub reflected: bool,
}

impl Laser {
    pub const SPEED: f32 = 200.0;

    /// Head start so a freshly fired laser clears its own turret.
    pub const MUZZLE_ADVANCE: f32 = 0.2;

    /// Aim from one center point at another. Returns `None` when the
    /// two points coincide and no direction exists.
    pub fn fire(origin: Vec2, target: Vec2) -> Option<Self> {
        let trajectory = (target - origin).try_normalize()?;
        let mut laser = Self {
            pos: origin,
            trajectory,
            reflected: false,
        };
        laser.advance(Self::MUZZLE_ADVANCE);
        Some(laser)
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.trajectory * Self::SPEED * dt;
    }

    /// Send the laser straight back the way it came. Reflected lasers
    /// are harmless to the player and lethal to enemies.
    pub fn reflect(&mut self) {
        self.trajectory = -self.trajectory;
        self.reflected = true;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::tile(self.pos.x.floor() as i32, self.pos.y.floor() as i32)
    }
}

/// Enemy fire cadence. An enemy becomes eligible to shoot once enough
/// time has passed; the actual shot is still gated by a coin flip each
/// tick, so fire is irregular but never faster than the floor.
#[derive(Component, Debug, Default)]
pub struct ShotClock {
    elapsed: f32,
}

impl ShotClock {
    pub const MIN_TIME_BETWEEN_SHOTS: f32 = 3.0;

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn ready(&self) -> bool {
        self.elapsed >= Self::MIN_TIME_BETWEEN_SHOTS
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Melee arc swing. The blade sweeps a quarter circle at a fixed
/// angular speed; the covered quadrant depends on the facing at the
/// moment the swing starts.
#[derive(Component, Debug, Default)]
pub struct Sword {
    pub swinging: bool,
    pub angle: f32,
    pub target_angle: f32,
}

impl Sword {
    pub const LENGTH: i32 = TILE_SIZE;
    pub const ROTATION_SPEED: f32 = 90.0;

    /// Start a swing if one is not already in progress. Angles are
    /// measured counterclockwise from the positive x axis.
    pub fn start_swing(&mut self, facing: Direction) {
        if self.swinging {
            return;
        }
        let (start, end) = match facing {
            Direction::Up => (0.0, 90.0),
            Direction::Left => (90.0, 180.0),
            Direction::Down => (180.0, 270.0),
            Direction::Right => (270.0, 360.0),
        };
        self.swinging = true;
        self.angle = start;
        self.target_angle = end;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.swinging {
            return;
        }
        self.angle += Self::ROTATION_SPEED * dt;
        if self.angle >= self.target_angle {
            self.angle = self.target_angle;
            self.swinging = false;
        }
    }

    /// Pixel where the hilt sits: the midpoint of the facing edge of
    /// the wielder's box.
    pub fn hand_position(wielder: &Bounds, facing: Direction) -> (i32, i32) {
        let (cx, cy) = wielder.center();
        match facing {
            Direction::Up => (cx, wielder.top()),
            Direction::Down => (cx, wielder.bottom()),
            Direction::Left => (wielder.left(), cy),
            Direction::Right => (wielder.right(), cy),
        }
    }

    /// Conservative hit box for the whole swing: the quadrant-sized
    /// square the arc sweeps through, anchored at the hand.
    pub fn bounding_rect(hand: (i32, i32), facing: Direction) -> Bounds {
        let (hx, hy) = hand;
        let l = Self::LENGTH;
        match facing {
            Direction::Up => Bounds::new(hx, hy - l, l, l),
            Direction::Left => Bounds::new(hx - l, hy - l, l, l),
            Direction::Down => Bounds::new(hx - l, hy, l, l),
            Direction::Right => Bounds::new(hx, hy, l, l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_intersection_is_exclusive_on_edges() {
        let a = Bounds::tile(0, 0);
        let b = Bounds::tile(32, 0);
        // Flush neighbors do not overlap.
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        // One pixel of penetration does.
        let c = Bounds::tile(31, 0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn grid_pos_uses_floor_division() {
        assert_eq!(Bounds::tile(0, 0).grid_pos(), GridPos::new(0, 0));
        assert_eq!(Bounds::tile(31, 31).grid_pos(), GridPos::new(0, 0));
        assert_eq!(Bounds::tile(32, 63).grid_pos(), GridPos::new(1, 1));
        assert_eq!(Bounds::tile(33, 64).grid_pos(), GridPos::new(1, 2));
    }

    #[test]
    fn direction_opposites() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn shot_clock_gates_on_three_seconds() {
        let mut clock = ShotClock::default();
        clock.tick(2.9);
        assert!(!clock.ready());
        clock.tick(0.1);
        assert!(clock.ready());
        clock.reset();
        assert!(!clock.ready());
    }

    #[test]
    fn laser_fires_toward_target_with_head_start() {
        let laser = Laser::fire(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)).unwrap();
        assert_eq!(laser.trajectory, Vec2::new(1.0, 0.0));
        // 0.2s at 200 px/s puts the laser 40px along its trajectory.
        assert_eq!(laser.pos, Vec2::new(40.0, 0.0));
        assert!(!laser.reflected);
    }

    #[test]
    fn laser_fire_at_own_position_is_rejected() {
        assert!(Laser::fire(Vec2::splat(16.0), Vec2::splat(16.0)).is_none());
    }

    #[test]
    fn laser_reflection_inverts_trajectory() {
        let mut laser = Laser::fire(Vec2::ZERO, Vec2::new(0.0, 50.0)).unwrap();
        laser.reflect();
        assert_eq!(laser.trajectory, Vec2::new(0.0, -1.0));
        assert!(laser.reflected);
    }

    #[test]
    fn sword_swing_arc_depends_on_facing() {
        let mut sword = Sword::default();
        sword.start_swing(Direction::Down);
        assert!(sword.swinging);
        assert_eq!(sword.angle, 180.0);
        assert_eq!(sword.target_angle, 270.0);

        // Starting again mid-swing does not restart the arc.
        sword.update(0.5);
        let mid = sword.angle;
        sword.start_swing(Direction::Up);
        assert_eq!(sword.angle, mid);
        assert_eq!(sword.target_angle, 270.0);
    }

    #[test]
    fn sword_swing_completes_after_one_second() {
        let mut sword = Sword::default();
        sword.start_swing(Direction::Right);
        sword.update(0.5);
        assert!(sword.swinging);
        sword.update(0.6);
        assert!(!sword.swinging);
        assert_eq!(sword.angle, 360.0);
    }

    #[test]
    fn sword_hit_box_covers_the_swept_quadrant() {
        let wielder = Bounds::tile(64, 64);
        // Facing up: hand at top-center, arc sweeps up and to the right.
        let hand = Sword::hand_position(&wielder, Direction::Up);
        assert_eq!(hand, (80, 64));
        assert_eq!(
            Sword::bounding_rect(hand, Direction::Up),
            Bounds::new(80, 32, 32, 32)
        );
        // Facing left: hand at left-center, arc sweeps up and to the left.
        let hand = Sword::hand_position(&wielder, Direction::Left);
        assert_eq!(hand, (64, 80));
        assert_eq!(
            Sword::bounding_rect(hand, Direction::Left),
            Bounds::new(32, 48, 32, 32)
        );
    }
}
