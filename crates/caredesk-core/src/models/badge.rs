/// Visual weight of a status badge. Front ends map each variant to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Success,
    Warning,
    Info,
    Danger,
    Neutral,
}
