//! The protocol's field manifest, embedded as a static table.
//!
//! One row per serialized field: name, sort position within its type
//! (`nth`), serialization type name and the VL/serialized/signing
//! attributes. The catalogue is append-only across amendments.

pub(crate) struct FieldEntry {
    pub name: &'static str,
    pub nth: i16,
    pub type_name: &'static str,
    pub is_vl_encoded: bool,
    pub is_serialized: bool,
    pub is_signing_field: bool,
}

macro_rules! field {
    ($name:literal, $nth:literal, $type_name:literal, $vl:literal, $ser:literal, $sig:literal) => {
        FieldEntry {
            name: $name,
            nth: $nth,
            type_name: $type_name,
            is_vl_encoded: $vl,
            is_serialized: $ser,
            is_signing_field: $sig,
        }
    };
}

/// Serialization type name → type code.
pub(crate) const TYPES: &[(&str, i16)] = &[
    ("Done", -1),
    ("Unknown", -2),
    ("NotPresent", 0),
    ("UInt16", 1),
    ("UInt32", 2),
    ("UInt64", 3),
    ("Hash128", 4),
    ("Hash256", 5),
    ("Amount", 6),
    ("Blob", 7),
    ("AccountID", 8),
    ("STObject", 14),
    ("STArray", 15),
    ("UInt8", 16),
    ("Hash160", 17),
    ("PathSet", 18),
    ("Vector256", 19),
    ("Issue", 24),
    ("Transaction", 10001),
    ("LedgerEntry", 10002),
    ("Validation", 10003),
    ("Metadata", 10004),
];

/// TransactionType name → wire code.
pub(crate) const TRANSACTION_TYPES: &[(&str, i16)] = &[
    ("Payment", 0),
    ("EscrowCreate", 1),
    ("EscrowFinish", 2),
    ("AccountSet", 3),
    ("EscrowCancel", 4),
    ("SetRegularKey", 5),
    ("OfferCreate", 7),
    ("OfferCancel", 8),
    ("TicketCreate", 10),
    ("SignerListSet", 12),
    ("PaymentChannelCreate", 13),
    ("PaymentChannelFund", 14),
    ("PaymentChannelClaim", 15),
    ("CheckCreate", 16),
    ("CheckCash", 17),
    ("CheckCancel", 18),
    ("DepositPreauth", 19),
    ("TrustSet", 20),
    ("AccountDelete", 21),
    ("NFTokenMint", 25),
    ("NFTokenBurn", 26),
    ("NFTokenCreateOffer", 27),
    ("NFTokenCancelOffer", 28),
    ("NFTokenAcceptOffer", 29),
    ("Clawback", 30),
    ("AMMClawback", 31),
    ("AMMCreate", 35),
    ("AMMDeposit", 36),
    ("AMMWithdraw", 37),
    ("AMMVote", 38),
    ("AMMBid", 39),
    ("AMMDelete", 40),
    ("LedgerStateFix", 53),
    ("NFTokenModify", 61),
    ("DelegateSet", 64),
    ("Batch", 71),
];

/// LedgerEntryType name → wire code.
pub(crate) const LEDGER_ENTRY_TYPES: &[(&str, i16)] = &[
    ("AccountRoot", 0x61),
    ("DirectoryNode", 0x64),
    ("RippleState", 0x72),
    ("Ticket", 0x54),
    ("SignerList", 0x53),
    ("Offer", 0x6f),
    ("LedgerHashes", 0x68),
    ("Amendments", 0x66),
    ("FeeSettings", 0x73),
    ("Escrow", 0x75),
    ("PayChannel", 0x78),
    ("Check", 0x43),
    ("DepositPreauth", 0x70),
    ("NFTokenPage", 0x50),
    ("NFTokenOffer", 0x37),
    ("AMM", 0x79),
    ("Delegate", 0x83),
];

/// The field manifest proper.
pub(crate) const FIELDS: &[FieldEntry] = &[
    // UInt8
    field!("CloseResolution", 1, "UInt8", false, true, true),
    field!("Method", 2, "UInt8", false, true, true),
    field!("TransactionResult", 3, "UInt8", false, true, true),
    field!("TickSize", 16, "UInt8", false, true, true),
    // UInt16
    field!("LedgerEntryType", 1, "UInt16", false, true, true),
    field!("TransactionType", 2, "UInt16", false, true, true),
    field!("SignerWeight", 3, "UInt16", false, true, true),
    field!("TransferFee", 4, "UInt16", false, true, true),
    field!("TradingFee", 5, "UInt16", false, true, true),
    field!("DiscountedFee", 6, "UInt16", false, true, true),
    field!("LedgerFixType", 21, "UInt16", false, true, true),
    // UInt32
    field!("NetworkID", 1, "UInt32", false, true, true),
    field!("Flags", 2, "UInt32", false, true, true),
    field!("SourceTag", 3, "UInt32", false, true, true),
    field!("Sequence", 4, "UInt32", false, true, true),
    field!("PreviousTxnLgrSeq", 5, "UInt32", false, true, true),
    field!("LedgerSequence", 6, "UInt32", false, true, true),
    field!("CloseTime", 7, "UInt32", false, true, true),
    field!("ParentCloseTime", 8, "UInt32", false, true, true),
    field!("SigningTime", 9, "UInt32", false, true, true),
    field!("Expiration", 10, "UInt32", false, true, true),
    field!("TransferRate", 11, "UInt32", false, true, true),
    field!("WalletSize", 12, "UInt32", false, true, true),
    field!("OwnerCount", 13, "UInt32", false, true, true),
    field!("DestinationTag", 14, "UInt32", false, true, true),
    field!("HighQualityIn", 16, "UInt32", false, true, true),
    field!("HighQualityOut", 17, "UInt32", false, true, true),
    field!("LowQualityIn", 18, "UInt32", false, true, true),
    field!("LowQualityOut", 19, "UInt32", false, true, true),
    field!("QualityIn", 20, "UInt32", false, true, true),
    field!("QualityOut", 21, "UInt32", false, true, true),
    field!("OfferSequence", 25, "UInt32", false, true, true),
    field!("LastLedgerSequence", 27, "UInt32", false, true, true),
    field!("TransactionIndex", 28, "UInt32", false, true, true),
    field!("ReserveBase", 31, "UInt32", false, true, true),
    field!("ReserveIncrement", 32, "UInt32", false, true, true),
    field!("SetFlag", 33, "UInt32", false, true, true),
    field!("ClearFlag", 34, "UInt32", false, true, true),
    field!("SignerQuorum", 35, "UInt32", false, true, true),
    field!("CancelAfter", 36, "UInt32", false, true, true),
    field!("FinishAfter", 37, "UInt32", false, true, true),
    field!("SignerListID", 38, "UInt32", false, true, true),
    field!("SettleDelay", 39, "UInt32", false, true, true),
    field!("TicketCount", 40, "UInt32", false, true, true),
    field!("TicketSequence", 41, "UInt32", false, true, true),
    field!("NFTokenTaxon", 42, "UInt32", false, true, true),
    field!("MintedNFTokens", 43, "UInt32", false, true, true),
    field!("BurnedNFTokens", 44, "UInt32", false, true, true),
    field!("VoteWeight", 48, "UInt32", false, true, true),
    field!("FirstNFTokenSequence", 50, "UInt32", false, true, true),
    field!("PermissionValue", 51, "UInt32", false, true, true),
    // UInt64
    field!("IndexNext", 1, "UInt64", false, true, true),
    field!("IndexPrevious", 2, "UInt64", false, true, true),
    field!("BookNode", 3, "UInt64", false, true, true),
    field!("OwnerNode", 4, "UInt64", false, true, true),
    field!("BaseFee", 5, "UInt64", false, true, true),
    field!("ExchangeRate", 6, "UInt64", false, true, true),
    field!("LowNode", 7, "UInt64", false, true, true),
    field!("HighNode", 8, "UInt64", false, true, true),
    field!("DestinationNode", 9, "UInt64", false, true, true),
    field!("NFTokenOfferNode", 12, "UInt64", false, true, true),
    // Hash128
    field!("EmailHash", 1, "Hash128", false, true, true),
    // Hash160
    field!("TakerPaysCurrency", 1, "Hash160", false, true, true),
    field!("TakerPaysIssuer", 2, "Hash160", false, true, true),
    field!("TakerGetsCurrency", 3, "Hash160", false, true, true),
    field!("TakerGetsIssuer", 4, "Hash160", false, true, true),
    // Hash256
    field!("LedgerHash", 1, "Hash256", false, true, true),
    field!("ParentHash", 2, "Hash256", false, true, true),
    field!("TransactionHash", 3, "Hash256", false, true, true),
    field!("AccountHash", 4, "Hash256", false, true, true),
    field!("PreviousTxnID", 5, "Hash256", false, true, true),
    field!("LedgerIndex", 6, "Hash256", false, true, true),
    field!("WalletLocator", 7, "Hash256", false, true, true),
    field!("RootIndex", 8, "Hash256", false, true, true),
    field!("AccountTxnID", 9, "Hash256", false, true, true),
    field!("NFTokenID", 10, "Hash256", false, true, true),
    field!("AMMID", 14, "Hash256", false, true, true),
    field!("BookDirectory", 16, "Hash256", false, true, true),
    field!("InvoiceID", 17, "Hash256", false, true, true),
    field!("Amendment", 19, "Hash256", false, true, true),
    field!("Digest", 21, "Hash256", false, true, true),
    field!("Channel", 22, "Hash256", false, true, true),
    field!("CheckID", 24, "Hash256", false, true, true),
    field!("PreviousPageMin", 26, "Hash256", false, true, true),
    field!("NextPageMin", 27, "Hash256", false, true, true),
    field!("NFTokenBuyOffer", 28, "Hash256", false, true, true),
    field!("NFTokenSellOffer", 29, "Hash256", false, true, true),
    // Amount
    field!("Amount", 1, "Amount", false, true, true),
    field!("Balance", 2, "Amount", false, true, true),
    field!("LimitAmount", 3, "Amount", false, true, true),
    field!("TakerPays", 4, "Amount", false, true, true),
    field!("TakerGets", 5, "Amount", false, true, true),
    field!("LowLimit", 6, "Amount", false, true, true),
    field!("HighLimit", 7, "Amount", false, true, true),
    field!("Fee", 8, "Amount", false, true, true),
    field!("SendMax", 9, "Amount", false, true, true),
    field!("DeliverMin", 10, "Amount", false, true, true),
    field!("Amount2", 11, "Amount", false, true, true),
    field!("BidMin", 12, "Amount", false, true, true),
    field!("BidMax", 13, "Amount", false, true, true),
    field!("DeliveredAmount", 18, "Amount", false, true, true),
    field!("NFTokenBrokerFee", 19, "Amount", false, true, true),
    field!("LPTokenBalance", 20, "Amount", false, true, true),
    field!("LPTokenOut", 21, "Amount", false, true, true),
    field!("LPTokenIn", 22, "Amount", false, true, true),
    field!("EPrice", 25, "Amount", false, true, true),
    field!("Price", 26, "Amount", false, true, true),
    // Blob
    field!("PublicKey", 1, "Blob", true, true, true),
    field!("MessageKey", 2, "Blob", true, true, true),
    field!("SigningPubKey", 3, "Blob", true, true, true),
    field!("TxnSignature", 4, "Blob", true, true, false),
    field!("URI", 5, "Blob", true, true, true),
    field!("Signature", 6, "Blob", true, true, false),
    field!("Domain", 7, "Blob", true, true, true),
    field!("FundCode", 8, "Blob", true, true, true),
    field!("RemoveCode", 9, "Blob", true, true, true),
    field!("ExpireCode", 10, "Blob", true, true, true),
    field!("CreateCode", 11, "Blob", true, true, true),
    field!("MemoType", 12, "Blob", true, true, true),
    field!("MemoData", 13, "Blob", true, true, true),
    field!("MemoFormat", 14, "Blob", true, true, true),
    field!("Fulfillment", 16, "Blob", true, true, true),
    field!("Condition", 17, "Blob", true, true, true),
    field!("MasterSignature", 18, "Blob", true, true, false),
    // AccountID
    field!("Account", 1, "AccountID", true, true, true),
    field!("Owner", 2, "AccountID", true, true, true),
    field!("Destination", 3, "AccountID", true, true, true),
    field!("Issuer", 4, "AccountID", true, true, true),
    field!("Authorize", 5, "AccountID", true, true, true),
    field!("Unauthorize", 6, "AccountID", true, true, true),
    field!("RegularKey", 8, "AccountID", true, true, true),
    field!("NFTokenMinter", 9, "AccountID", true, true, true),
    field!("Holder", 11, "AccountID", true, true, true),
    field!("Delegate", 12, "AccountID", true, true, true),
    // STObject
    field!("ObjectEndMarker", 1, "STObject", false, true, true),
    field!("TransactionMetaData", 2, "STObject", false, true, true),
    field!("CreatedNode", 3, "STObject", false, true, true),
    field!("DeletedNode", 4, "STObject", false, true, true),
    field!("ModifiedNode", 5, "STObject", false, true, true),
    field!("PreviousFields", 6, "STObject", false, true, true),
    field!("FinalFields", 7, "STObject", false, true, true),
    field!("NewFields", 8, "STObject", false, true, true),
    field!("Memo", 10, "STObject", false, true, true),
    field!("SignerEntry", 11, "STObject", false, true, true),
    field!("NFToken", 12, "STObject", false, true, true),
    field!("Signer", 16, "STObject", false, true, true),
    field!("VoteEntry", 25, "STObject", false, true, true),
    field!("AuctionSlot", 26, "STObject", false, true, true),
    field!("AuthAccount", 27, "STObject", false, true, true),
    field!("RawTransaction", 28, "STObject", false, true, true),
    field!("Permission", 29, "STObject", false, true, true),
    // STArray
    field!("ArrayEndMarker", 1, "STArray", false, true, true),
    field!("Signers", 3, "STArray", false, true, false),
    field!("SignerEntries", 4, "STArray", false, true, true),
    field!("AffectedNodes", 8, "STArray", false, true, true),
    field!("Memos", 9, "STArray", false, true, true),
    field!("NFTokens", 10, "STArray", false, true, true),
    field!("VoteSlots", 12, "STArray", false, true, true),
    field!("AuthAccounts", 13, "STArray", false, true, true),
    field!("RawTransactions", 19, "STArray", false, true, true),
    field!("Permissions", 20, "STArray", false, true, true),
    // Vector256
    field!("Indexes", 1, "Vector256", true, true, true),
    field!("Hashes", 2, "Vector256", true, true, true),
    field!("Amendments", 3, "Vector256", true, true, true),
    field!("NFTokenOffers", 4, "Vector256", true, true, true),
    // Issue
    field!("Asset", 3, "Issue", false, true, true),
    field!("Asset2", 4, "Issue", false, true, true),
];
