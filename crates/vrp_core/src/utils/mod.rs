mod newtype_index;
