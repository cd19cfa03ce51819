pub mod balance_calculator;
pub mod portfolio_summarizer;
pub mod transfer_suggester;

pub use balance_calculator::BalanceCalculator;
pub use portfolio_summarizer::PortfolioSummarizer;
pub use transfer_suggester::TransferSuggester;
