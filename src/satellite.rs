use strum::{EnumString, IntoStaticStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, EnumString)]
pub enum Satellite {
    #[strum(serialize = "H08")]
    Himawari8,
    #[strum(serialize = "H09")]
    Himawari9,
}
