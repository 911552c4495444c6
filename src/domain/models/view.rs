#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Stories,
    Pricing,
    PaymentSuccess,
}
